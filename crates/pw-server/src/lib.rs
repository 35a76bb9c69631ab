//! HTTP server exposing the Pagewright pipeline.
//!
//! A thin axum surface over [`pw_pipeline::Pipeline`]:
//!
//! - `POST /api/generate` - stage preview content from a prompt
//! - `POST /api/publish` - snapshot, promote preview to live, mirror
//! - `GET /api/history` - list snapshot versions
//! - `POST /api/rollback` - restore a snapshot
//!
//! Pipeline operations are synchronous (the collaborator clients block),
//! so handlers run them on the blocking thread pool. Serving the static
//! site itself is out of scope; any static file server can point at the
//! site directory.

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use pw_pipeline::Pipeline;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Run the server until shutdown (Ctrl-C).
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(
    config: ServerConfig,
    pipeline: Arc<Pipeline>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState { pipeline });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
