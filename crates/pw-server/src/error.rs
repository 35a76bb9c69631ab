//! Server error type and HTTP status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pw_pipeline::PipelineError;
use pw_store::StoreError;
use serde_json::json;

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Handler plumbing failure (blocking task join).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(e) => match e {
                PipelineError::EmptyPrompt | PipelineError::InvalidResponse(_) => {
                    StatusCode::BAD_REQUEST
                }
                PipelineError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
                PipelineError::Generation(_) => StatusCode::BAD_GATEWAY,
                PipelineError::Store(StoreError::InvalidVersion(_)) => StatusCode::BAD_REQUEST,
                PipelineError::Config(_)
                | PipelineError::PublishAborted(_)
                | PipelineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
