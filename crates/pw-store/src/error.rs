//! Store error types.

use std::path::PathBuf;

/// Error from revision store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Snapshot id does not exist in the history directory.
    #[error("snapshot {0} not found")]
    SnapshotNotFound(String),

    /// Caller-supplied version string failed validation.
    #[error("invalid version id: {0:?}")]
    InvalidVersion(String),

    /// Filesystem failure, with path context.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path the operation was touching.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
