//! Content generator collaborator.
//!
//! The pipeline talks to the external natural-language generator through
//! the [`ContentGenerator`] trait; [`GroqGenerator`] is the production
//! implementation against an OpenAI-compatible chat-completions endpoint.
//! Keeping the seam a trait lets tests substitute canned generators and
//! leaves room for a retrying implementation without touching pipeline
//! logic.

mod error;
mod groq;

use std::collections::BTreeMap;

use pw_store::SiteFile;

pub use error::GeneratorError;
pub use groq::GroqGenerator;

/// Staged content per site file, as validated from a generator reply.
pub type PreviewSet = BTreeMap<SiteFile, String>;

/// External natural-language content generator.
pub trait ContentGenerator: Send + Sync {
    /// Produce new full content for site files from an instruction and
    /// the current live content of every site file.
    ///
    /// Implementations must validate the reply shape: anything other
    /// than a `{"files": {name: string}}` object is a
    /// [`GeneratorError::InvalidResponse`], even on transport success.
    fn generate(
        &self,
        prompt: &str,
        current: &BTreeMap<SiteFile, String>,
    ) -> Result<PreviewSet, GeneratorError>;
}
