//! Remote mirror collaborator.
//!
//! After a publish, the promoted content is pushed best-effort to a
//! remote content store through the [`Mirror`] trait. [`GitHubMirror`]
//! commits via the GitHub contents API; [`NullMirror`] is wired in when
//! no mirror is configured and turns the commit into a logged no-op.
//! Mirror failure never fails a publish; the pipeline reports it in the
//! publish outcome.

mod error;
mod github;

use std::collections::BTreeMap;

use pw_store::SiteFile;
use tracing::debug;

pub use error::MirrorError;
pub use github::GitHubMirror;

/// Remote store receiving a copy of published content.
pub trait Mirror: Send + Sync {
    /// Commit the given files with a human-readable message.
    fn commit(&self, files: &BTreeMap<SiteFile, String>, message: &str)
    -> Result<(), MirrorError>;
}

/// Mirror used when credentials are unconfigured. Logs and succeeds.
pub struct NullMirror;

impl Mirror for NullMirror {
    fn commit(
        &self,
        files: &BTreeMap<SiteFile, String>,
        _message: &str,
    ) -> Result<(), MirrorError> {
        debug!(count = files.len(), "Mirror not configured, skipping commit");
        Ok(())
    }
}
