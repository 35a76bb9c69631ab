//! Rollback API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use pw_pipeline::PipelineError;
use pw_store::VersionId;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::handlers::run_blocking;
use crate::state::AppState;

/// Request for POST /api/rollback.
#[derive(Deserialize)]
pub(crate) struct RollbackRequest {
    /// Snapshot version to restore. Missing is treated as empty and
    /// rejected with 400.
    #[serde(default)]
    version: String,
}

/// Response for POST /api/rollback.
#[derive(Debug, Serialize)]
pub(crate) struct RollbackResponse {
    ok: bool,
}

/// Handle POST /api/rollback.
pub(crate) async fn rollback(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RollbackRequest>,
) -> Result<Json<RollbackResponse>, ServerError> {
    // Version strings are validated here, before any store lookup.
    let version =
        VersionId::parse(&request.version).map_err(|e| ServerError::Pipeline(e.into()))?;

    run_blocking(Arc::clone(&state.pipeline), move |pipeline| {
        pipeline.rollback(&version)
    })
    .await?;

    Ok(Json(RollbackResponse { ok: true }))
}
