//! The preview/publish/rollback pipeline.
//!
//! Ties the revision store and the two external collaborators together:
//!
//! ```text
//! caller ──generate──► rate limiter ──► generator ──► preview files
//! caller ──publish───► snapshot live ──► preview → live ──► mirror commit
//! caller ──rollback──► snapshot ──► live (preview untouched)
//! ```
//!
//! All site-state mutation goes through one [`Pipeline`] instance, which
//! serializes it behind a single mutex. Collaborators are injected as
//! trait objects so tests (and stricter retrying implementations) can be
//! substituted without touching the orchestration.

mod error;
pub mod mock;
mod pipeline;
mod rate_limit;

pub use error::PipelineError;
pub use pipeline::{GenerateOutcome, Pipeline, PromotionFailure, PublishOutcome};
pub use rate_limit::{DEFAULT_MIN_INTERVAL, RateLimiter};
