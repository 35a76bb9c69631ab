//! GitHub contents API mirror.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use pw_store::SiteFile;
use serde_json::{Value, json};
use tracing::{debug, info};
use ureq::Agent;

use crate::Mirror;
use crate::error::MirrorError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Request timeout in seconds.
const TIMEOUT: u64 = 30;

/// Mirror that commits published content to a GitHub repository.
///
/// Each file is a read-modify-write: fetch the current blob `sha` (absent
/// when the file does not exist yet), then PUT the new content with that
/// `sha` so concurrent writers conflict instead of clobbering.
pub struct GitHubMirror {
    agent: Agent,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
    path_prefix: String,
}

impl GitHubMirror {
    /// Create a mirror client.
    #[must_use]
    pub fn new(api_url: &str, token: &str, owner: &str, repo: &str, path_prefix: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            path_prefix: path_prefix.trim_matches('/').to_owned(),
        }
    }

    fn contents_url(&self, file: SiteFile) -> String {
        let path = if self.path_prefix.is_empty() {
            file.name().to_owned()
        } else {
            format!("{}/{}", self.path_prefix, file.name())
        };
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url, self.owner, self.repo, path
        )
    }

    /// Fetch the current blob `sha` for a remote path, `None` on 404.
    fn current_sha(&self, url: &str) -> Result<Option<String>, MirrorError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .call()?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }

        let mut body_reader = response.into_body();
        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(MirrorError::Http {
                status,
                body: error_body,
            });
        }

        let value: Value = body_reader.read_json()?;
        Ok(value
            .get("sha")
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    fn put_file(&self, url: &str, payload: &Value) -> Result<(), MirrorError> {
        let payload_bytes = serde_json::to_vec(payload)?;

        let response = self
            .agent
            .put(url)
            .header("Authorization", &format!("token {}", self.token))
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_body = response
                .into_body()
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(MirrorError::Http {
                status,
                body: error_body,
            });
        }
        Ok(())
    }
}

impl Mirror for GitHubMirror {
    fn commit(
        &self,
        files: &BTreeMap<SiteFile, String>,
        message: &str,
    ) -> Result<(), MirrorError> {
        for (file, content) in files {
            let url = self.contents_url(*file);
            let sha = self.current_sha(&url)?;
            let payload = commit_payload(content, message, sha.as_deref());
            self.put_file(&url, &payload)?;
            debug!(file = %file, "Mirrored file");
        }
        info!(count = files.len(), message = %message, "Mirror commit complete");
        Ok(())
    }
}

/// Build the contents-API PUT body.
fn commit_payload(content: &str, message: &str, sha: Option<&str>) -> Value {
    let mut payload = json!({
        "message": message,
        "content": BASE64.encode(content.as_bytes()),
    });
    if let Some(sha) = sha {
        payload["sha"] = json!(sha);
    }
    payload
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mirror() -> GitHubMirror {
        GitHubMirror::new(DEFAULT_API_URL, "t0ken", "acme", "website", "site")
    }

    #[test]
    fn test_contents_url() {
        assert_eq!(
            mirror().contents_url(SiteFile::Page),
            "https://api.github.com/repos/acme/website/contents/site/live.html"
        );
    }

    #[test]
    fn test_contents_url_without_prefix() {
        let mirror = GitHubMirror::new(DEFAULT_API_URL, "t0ken", "acme", "website", "");
        assert_eq!(
            mirror.contents_url(SiteFile::Script),
            "https://api.github.com/repos/acme/website/contents/main.js"
        );
    }

    #[test]
    fn test_commit_payload_encodes_content() {
        let payload = commit_payload("<h1>B</h1>", "Publish 1756500000", None);

        assert_eq!(payload["message"], "Publish 1756500000");
        assert_eq!(payload["content"], BASE64.encode(b"<h1>B</h1>"));
        assert!(payload.get("sha").is_none());
    }

    #[test]
    fn test_commit_payload_includes_sha_when_known() {
        let payload = commit_payload("x", "msg", Some("abc123"));
        assert_eq!(payload["sha"], "abc123");
    }

    #[test]
    fn test_null_mirror_is_noop() {
        let mut files = BTreeMap::new();
        files.insert(SiteFile::Page, "<h1>B</h1>".to_owned());

        assert!(crate::NullMirror.commit(&files, "msg").is_ok());
    }
}
