//! Publish API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use pw_pipeline::PromotionFailure;
use pw_store::{SiteFile, VersionId};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::run_blocking;
use crate::state::AppState;

/// Response for POST /api/publish.
///
/// Degraded paths are part of the contract: per-file promotion failures
/// and mirror failures show up here instead of being swallowed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublishResponse {
    ok: bool,
    /// Snapshot taken before promotion.
    version: VersionId,
    /// Files whose preview content went live.
    promoted: Vec<SiteFile>,
    /// Files whose promotion failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<FailedFile>,
    /// Rendered mirror error, when the best-effort mirror commit failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    mirror_error: Option<String>,
}

/// One failed promotion.
#[derive(Serialize)]
struct FailedFile {
    file: SiteFile,
    error: String,
}

impl From<PromotionFailure> for FailedFile {
    fn from(failure: PromotionFailure) -> Self {
        Self {
            file: failure.file,
            error: failure.error,
        }
    }
}

/// Handle POST /api/publish.
pub(crate) async fn publish(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PublishResponse>, ServerError> {
    let outcome = run_blocking(Arc::clone(&state.pipeline), |pipeline| pipeline.publish()).await?;

    Ok(Json(PublishResponse {
        ok: true,
        version: outcome.version,
        promoted: outcome.promoted,
        failed: outcome.failed.into_iter().map(FailedFile::from).collect(),
        mirror_error: outcome.mirror_error,
    }))
}
