//! History API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use pw_store::VersionId;
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::run_blocking;
use crate::state::AppState;

/// Response for GET /api/history.
#[derive(Serialize)]
pub(crate) struct HistoryResponse {
    /// Snapshot versions, oldest first.
    versions: Vec<VersionId>,
}

/// Handle GET /api/history.
pub(crate) async fn history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let versions = run_blocking(Arc::clone(&state.pipeline), |pipeline| pipeline.history()).await?;

    Ok(Json(HistoryResponse { versions }))
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::handlers::publish;
    use crate::handlers::testutil::default_state;

    #[tokio::test]
    async fn test_history_empty_for_fresh_site() {
        let (state, _dir) = default_state();

        let response = history(State(state)).await.unwrap();

        assert!(response.0.versions.is_empty());
    }

    #[tokio::test]
    async fn test_history_lists_published_versions() {
        let (state, _dir) = default_state();

        publish::publish(State(Arc::clone(&state))).await.unwrap();
        publish::publish(State(Arc::clone(&state))).await.unwrap();

        let response = history(State(state)).await.unwrap();

        assert_eq!(response.0.versions.len(), 2);
        assert!(response.0.versions[0] < response.0.versions[1]);
    }
}
