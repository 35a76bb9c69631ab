//! Mirror error types.

/// Error from remote mirror operations.
///
/// Mirror errors are logged and surfaced in the publish outcome; they
/// never fail the publish itself.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// HTTP request error. Status 0 means the request never completed.
    #[error("mirror HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// JSON error while building or reading a request.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for MirrorError {
    fn from(e: serde_json::Error) -> Self {
        MirrorError::Json(e.to_string())
    }
}

impl From<ureq::Error> for MirrorError {
    fn from(e: ureq::Error) -> Self {
        MirrorError::Http {
            status: 0,
            body: e.to_string(),
        }
    }
}
