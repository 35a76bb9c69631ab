//! The closed set of site files.

use std::fmt;

use serde::Serialize;

/// One of the fixed content units the pipeline manages.
///
/// The set is closed at compile time: names outside this enum never
/// create files on disk. Caller input is checked with [`SiteFile::from_name`]
/// at the boundary; names the generator invents are simply dropped there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SiteFile {
    /// Page markup (`live.html`).
    #[serde(rename = "live.html")]
    Page,
    /// Page script (`main.js`).
    #[serde(rename = "main.js")]
    Script,
    /// Stylesheet (`styles.css`).
    #[serde(rename = "styles.css")]
    Stylesheet,
}

impl SiteFile {
    /// All site files, in stable order.
    pub const ALL: [SiteFile; 3] = [SiteFile::Page, SiteFile::Script, SiteFile::Stylesheet];

    /// File name under the site directory.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SiteFile::Page => "live.html",
            SiteFile::Script => "main.js",
            SiteFile::Stylesheet => "styles.css",
        }
    }

    /// Look up a site file by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|file| file.name() == name)
    }

    /// Name of the staged preview sibling.
    #[must_use]
    pub fn preview_name(self) -> String {
        format!("preview_{}", self.name())
    }

    /// Content written when a live file is missing at startup.
    pub(crate) const fn seed_content(self) -> &'static str {
        match self {
            SiteFile::Page => {
                "<!doctype html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>New site</title>\n  <link rel=\"stylesheet\" href=\"styles.css\">\n</head>\n<body>\n  <h1>New site</h1>\n  <script src=\"main.js\"></script>\n</body>\n</html>\n"
            }
            SiteFile::Script => "// site script\n",
            SiteFile::Stylesheet => "/* site styles */\n",
        }
    }
}

impl fmt::Display for SiteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_name_round_trips_all_files() {
        for file in SiteFile::ALL {
            assert_eq!(SiteFile::from_name(file.name()), Some(file));
        }
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert_eq!(SiteFile::from_name("evil.html"), None);
        assert_eq!(SiteFile::from_name(""), None);
        assert_eq!(SiteFile::from_name("LIVE.HTML"), None);
    }

    #[test]
    fn test_preview_name() {
        assert_eq!(SiteFile::Page.preview_name(), "preview_live.html");
        assert_eq!(SiteFile::Script.preview_name(), "preview_main.js");
    }

    #[test]
    fn test_serializes_as_file_name() {
        let json = serde_json::to_string(&SiteFile::Stylesheet).unwrap();
        assert_eq!(json, "\"styles.css\"");
    }
}
