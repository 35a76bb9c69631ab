//! Pipeline error taxonomy.

use pw_generate::GeneratorError;
use pw_store::StoreError;

/// Error from pipeline operations, as exposed to callers.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Caller supplied an empty or whitespace-only prompt.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Generation rejected by the rate limiter. Retry later; not a fault.
    #[error("rate limited: another generation ran too recently")]
    RateLimited,

    /// Required generator credential is missing. Fatal to the operation,
    /// not to the process.
    #[error("generator not configured: {0}")]
    Config(String),

    /// Generator reply violated the files contract. No preview mutated.
    #[error("invalid generator response: {0}")]
    InvalidResponse(String),

    /// Generator transport or status failure. No preview mutated.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Unknown rollback version. No live file touched.
    #[error("version {0} not found")]
    NotFound(String),

    /// Snapshot failed before promotion; publish aborted with no live
    /// file changed.
    #[error("publish aborted, snapshot failed: {0}")]
    PublishAborted(#[source] StoreError),

    /// Local persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GeneratorError> for PipelineError {
    fn from(e: GeneratorError) -> Self {
        match e {
            GeneratorError::Config(msg) => PipelineError::Config(msg),
            GeneratorError::InvalidResponse(msg) => PipelineError::InvalidResponse(msg),
            GeneratorError::Http { status, body } => {
                PipelineError::Generation(format!("HTTP {status}: {body}"))
            }
            GeneratorError::Json(msg) => PipelineError::Generation(msg),
        }
    }
}
