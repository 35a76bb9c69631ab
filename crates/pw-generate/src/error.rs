//! Generator error types.

/// Error from the content generator collaborator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Required credential or setting is missing. Fatal to the
    /// generation call only; the process keeps running.
    #[error("generator not configured: {0}")]
    Config(String),

    /// HTTP request error. Status 0 means the request never completed
    /// (network failure, timeout).
    #[error("generator HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// JSON serialization error while building the request.
    #[error("JSON error: {0}")]
    Json(String),

    /// Reply did not match the `{"files": {name: string}}` contract.
    #[error("invalid generator response: {0}")]
    InvalidResponse(String),
}

impl From<serde_json::Error> for GeneratorError {
    fn from(e: serde_json::Error) -> Self {
        GeneratorError::Json(e.to_string())
    }
}

impl From<ureq::Error> for GeneratorError {
    fn from(e: ureq::Error) -> Self {
        GeneratorError::Http {
            status: 0,
            body: e.to_string(),
        }
    }
}
