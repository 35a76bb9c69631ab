//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/generate", post(handlers::generate::generate))
        .route("/api/publish", post(handlers::publish::publish))
        .route("/api/history", get(handlers::history::history))
        .route("/api/rollback", post(handlers::rollback::rollback));

    Router::new().merge(api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(security::content_type_options_layer())
            .layer(security::frame_options_layer()),
    )
    .with_state(state)
}
