//! Application state.

use std::sync::Arc;

use pw_pipeline::Pipeline;

/// State shared across all request handlers.
pub(crate) struct AppState {
    /// The revision pipeline; serializes all site-state mutation.
    pub(crate) pipeline: Arc<Pipeline>,
}
