//! Mock collaborators for testing.
//!
//! In-memory [`ContentGenerator`] and [`Mirror`] implementations so
//! pipeline and server tests run without network access.

use std::collections::BTreeMap;
use std::sync::Mutex;

use pw_generate::{ContentGenerator, GeneratorError, PreviewSet};
use pw_mirror::{Mirror, MirrorError};
use pw_store::SiteFile;

/// Canned reply behavior for [`MockGenerator`].
enum MockReply {
    Files(PreviewSet),
    Malformed,
    Unreachable,
}

/// Generator returning a canned reply and recording prompts.
///
/// # Example
///
/// ```ignore
/// let generator = MockGenerator::returning(SiteFile::Page, "<h1>B</h1>");
/// ```
pub struct MockGenerator {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Generator that stages the given content for one file.
    #[must_use]
    pub fn returning(file: SiteFile, content: &str) -> Self {
        let mut files = PreviewSet::new();
        files.insert(file, content.to_owned());
        Self::with_files(files)
    }

    /// Generator that stages the given set.
    #[must_use]
    pub fn with_files(files: PreviewSet) -> Self {
        Self {
            reply: MockReply::Files(files),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator whose reply violates the files contract.
    #[must_use]
    pub fn malformed() -> Self {
        Self {
            reply: MockReply::Malformed,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator whose transport always fails.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            reply: MockReply::Unreachable,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts seen so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ContentGenerator for MockGenerator {
    fn generate(
        &self,
        prompt: &str,
        _current: &BTreeMap<SiteFile, String>,
    ) -> Result<PreviewSet, GeneratorError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        match &self.reply {
            MockReply::Files(files) => Ok(files.clone()),
            MockReply::Malformed => Err(GeneratorError::InvalidResponse(
                "\"files\" is not an object".to_owned(),
            )),
            MockReply::Unreachable => Err(GeneratorError::Http {
                status: 0,
                body: "connection refused".to_owned(),
            }),
        }
    }
}

/// Mirror recording every commit, optionally failing them.
pub struct RecordingMirror {
    fail: bool,
    commits: Mutex<Vec<(BTreeMap<SiteFile, String>, String)>>,
}

impl RecordingMirror {
    /// Mirror that accepts and records commits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fail: false,
            commits: Mutex::new(Vec::new()),
        }
    }

    /// Mirror that fails every commit after recording it.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            commits: Mutex::new(Vec::new()),
        }
    }

    /// Commits seen so far, as (files, message) pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn commits(&self) -> Vec<(BTreeMap<SiteFile, String>, String)> {
        self.commits.lock().unwrap().clone()
    }
}

impl Default for RecordingMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl Mirror for RecordingMirror {
    fn commit(
        &self,
        files: &BTreeMap<SiteFile, String>,
        message: &str,
    ) -> Result<(), MirrorError> {
        self.commits
            .lock()
            .unwrap()
            .push((files.clone(), message.to_owned()));
        if self.fail {
            return Err(MirrorError::Http {
                status: 502,
                body: "bad gateway".to_owned(),
            });
        }
        Ok(())
    }
}
