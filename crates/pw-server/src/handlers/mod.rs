//! API endpoint handlers.

pub(crate) mod generate;
pub(crate) mod history;
pub(crate) mod publish;
pub(crate) mod rollback;

use std::sync::Arc;

use pw_pipeline::{Pipeline, PipelineError};

use crate::error::ServerError;

/// Run a pipeline call on the blocking thread pool.
///
/// Pipeline operations block (sync collaborator clients, coarse store
/// lock), so they must not run on the async worker threads.
pub(crate) async fn run_blocking<T, F>(pipeline: Arc<Pipeline>, call: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce(&Pipeline) -> Result<T, PipelineError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&pipeline))
        .await
        .map_err(|e| ServerError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ServerError::from)
}
