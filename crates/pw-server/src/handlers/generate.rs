//! Generate API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use pw_store::SiteFile;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::handlers::run_blocking;
use crate::state::AppState;

/// Request for POST /api/generate.
#[derive(Deserialize)]
pub(crate) struct GenerateRequest {
    /// Natural-language edit instruction. Missing is treated as empty
    /// and rejected with 400.
    #[serde(default)]
    prompt: String,
}

/// Response for POST /api/generate.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateResponse {
    ok: bool,
    /// Files that received new preview content.
    staged: Vec<SiteFile>,
}

/// Handle POST /api/generate.
pub(crate) async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ServerError> {
    let outcome = run_blocking(Arc::clone(&state.pipeline), move |pipeline| {
        pipeline.generate(&request.prompt)
    })
    .await?;

    Ok(Json(GenerateResponse {
        ok: true,
        staged: outcome.staged,
    }))
}
