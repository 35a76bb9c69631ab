//! Pipeline orchestration.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use pw_generate::ContentGenerator;
use pw_mirror::Mirror;
use pw_store::{RevisionStore, SiteFile, StoreError, VersionId};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::rate_limit::RateLimiter;

/// Result of a generation call.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// Site files that received new preview content.
    pub staged: Vec<SiteFile>,
}

/// One site file that failed to promote during publish.
#[derive(Debug)]
pub struct PromotionFailure {
    /// File that failed.
    pub file: SiteFile,
    /// Rendered store error.
    pub error: String,
}

/// Result of a publish call.
///
/// Publish degrades rather than rolls back: `failed` and `mirror_error`
/// make the degraded paths explicit instead of hiding them in logs.
#[derive(Debug)]
pub struct PublishOutcome {
    /// Snapshot taken before promotion.
    pub version: VersionId,
    /// Files whose preview content went live.
    pub promoted: Vec<SiteFile>,
    /// Files whose promotion failed; earlier promotions stand.
    pub failed: Vec<PromotionFailure>,
    /// Rendered mirror error, when the best-effort mirror commit failed.
    pub mirror_error: Option<String>,
}

/// The revision pipeline: generate → publish → rollback over one site.
///
/// All site-state mutation is serialized by the store mutex, held for
/// the whole operation. Generation keeps it across the collaborator
/// call so the live set it sends cannot interleave with a concurrent
/// publish; expected load is a single editor, so the coarse lock is the
/// design, not a shortcut.
pub struct Pipeline {
    store: Mutex<RevisionStore>,
    generator: Arc<dyn ContentGenerator>,
    mirror: Arc<dyn Mirror>,
    limiter: RateLimiter,
}

impl Pipeline {
    /// Assemble a pipeline from its parts.
    #[must_use]
    pub fn new(
        store: RevisionStore,
        generator: Arc<dyn ContentGenerator>,
        mirror: Arc<dyn Mirror>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            generator,
            mirror,
            limiter,
        }
    }

    /// Stage new preview content from a natural-language prompt.
    ///
    /// Live content is never touched. The rate-limit admission is
    /// consumed before the collaborator call, so a failed call still
    /// counts against the interval.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn generate(&self, prompt: &str) -> Result<GenerateOutcome, PipelineError> {
        if prompt.trim().is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }
        if !self.limiter.admit() {
            return Err(PipelineError::RateLimited);
        }

        let store = self.store.lock().unwrap();
        let current = store.read_live_set()?;
        let staged = self.generator.generate(prompt, &current)?;

        for (file, content) in &staged {
            store.write_preview(*file, content)?;
        }

        info!(staged = staged.len(), "Generation staged preview content");
        Ok(GenerateOutcome {
            staged: staged.keys().copied().collect(),
        })
    }

    /// Promote staged preview content to live.
    ///
    /// Snapshots the live state first; a snapshot failure aborts with no
    /// live mutation. Promotion is best effort per file, and the mirror
    /// commit is best effort overall — see [`PublishOutcome`].
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn publish(&self) -> Result<PublishOutcome, PipelineError> {
        let store = self.store.lock().unwrap();

        let version = store.snapshot().map_err(PipelineError::PublishAborted)?;

        let mut promoted = BTreeMap::new();
        let mut failed = Vec::new();
        for file in SiteFile::ALL {
            match store.promote(file) {
                Ok(Some(content)) => {
                    promoted.insert(file, content);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(file = %file, error = %e, "Promotion failed, continuing");
                    failed.push(PromotionFailure {
                        file,
                        error: e.to_string(),
                    });
                }
            }
        }

        let message = format!("Publish {version}");
        let mirror_error = match self.mirror.commit(&promoted, &message) {
            Ok(()) => None,
            Err(e) => {
                warn!(version = %version, error = %e, "Mirror commit failed; local publish stands");
                Some(e.to_string())
            }
        };

        info!(version = %version, promoted = promoted.len(), "Published");
        Ok(PublishOutcome {
            version,
            promoted: promoted.keys().copied().collect(),
            failed,
            mirror_error,
        })
    }

    /// Restore live content from a snapshot. Preview state is untouched.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn rollback(&self, version: &VersionId) -> Result<(), PipelineError> {
        let store = self.store.lock().unwrap();
        store.restore(version).map_err(|e| match e {
            StoreError::SnapshotNotFound(v) => PipelineError::NotFound(v),
            other => PipelineError::Store(other),
        })
    }

    /// List snapshot versions, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn history(&self) -> Result<Vec<VersionId>, PipelineError> {
        let store = self.store.lock().unwrap();
        Ok(store.list()?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use pw_store::RevisionStore;
    use tempfile::TempDir;

    use super::*;
    use crate::mock::{MockGenerator, RecordingMirror};

    struct Fixture {
        _dir: TempDir,
        pipeline: Pipeline,
        mirror: Arc<RecordingMirror>,
        site_dir: std::path::PathBuf,
    }

    /// Pipeline over a temp store, a canned generator and a recording
    /// mirror. The rate limiter interval is zero unless a test says
    /// otherwise.
    fn fixture(generator: MockGenerator) -> Fixture {
        fixture_with_interval(generator, Duration::ZERO)
    }

    fn fixture_with_interval(generator: MockGenerator, interval: Duration) -> Fixture {
        let dir = TempDir::new().unwrap();
        let site_dir = dir.path().join("site");
        let store = RevisionStore::open(&site_dir).unwrap();
        let mirror = Arc::new(RecordingMirror::new());
        let pipeline = Pipeline::new(
            store,
            Arc::new(generator),
            Arc::clone(&mirror) as Arc<dyn Mirror>,
            RateLimiter::new(interval),
        );
        Fixture {
            _dir: dir,
            pipeline,
            mirror,
            site_dir,
        }
    }

    fn live_page(f: &Fixture) -> String {
        std::fs::read_to_string(f.site_dir.join("live.html")).unwrap()
    }

    fn preview_page(f: &Fixture) -> Option<String> {
        std::fs::read_to_string(f.site_dir.join("preview_live.html")).ok()
    }

    #[test]
    fn test_generate_stages_preview_only() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>"));
        let live_before = live_page(&f);

        let outcome = f.pipeline.generate("make title B").unwrap();

        assert_eq!(outcome.staged, vec![SiteFile::Page]);
        assert_eq!(live_page(&f), live_before);
        assert_eq!(preview_page(&f), Some("<h1>B</h1>".to_owned()));
    }

    #[test]
    fn test_generate_rejects_empty_prompt() {
        let f = fixture_with_interval(
            MockGenerator::returning(SiteFile::Page, "x"),
            Duration::from_secs(3600),
        );

        let err = f.pipeline.generate("   ").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyPrompt));

        // The rejected prompt consumed no admission.
        assert!(f.pipeline.generate("real prompt").is_ok());
    }

    #[test]
    fn test_generate_rate_limited() {
        let f = fixture_with_interval(
            MockGenerator::returning(SiteFile::Page, "x"),
            Duration::from_secs(3600),
        );

        f.pipeline.generate("first").unwrap();
        let err = f.pipeline.generate("second").unwrap_err();

        assert!(matches!(err, PipelineError::RateLimited));
    }

    #[test]
    fn test_failed_generation_still_consumes_admission() {
        let f = fixture_with_interval(MockGenerator::malformed(), Duration::from_secs(3600));

        let err = f.pipeline.generate("first").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidResponse(_)));

        let err = f.pipeline.generate("second").unwrap_err();
        assert!(matches!(err, PipelineError::RateLimited));
    }

    #[test]
    fn test_malformed_reply_leaves_preview_unchanged() {
        let f = fixture(MockGenerator::malformed());

        let err = f.pipeline.generate("make title B").unwrap_err();

        assert!(matches!(err, PipelineError::InvalidResponse(_)));
        assert_eq!(preview_page(&f), None);
    }

    #[test]
    fn test_unreachable_generator_is_generation_error() {
        let f = fixture(MockGenerator::unreachable());
        let err = f.pipeline.generate("make title B").unwrap_err();
        assert!(matches!(err, PipelineError::Generation(_)));
    }

    #[test]
    fn test_publish_snapshots_then_promotes() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>"));
        let live_before = live_page(&f);

        f.pipeline.generate("make title B").unwrap();
        let outcome = f.pipeline.publish().unwrap();

        assert_eq!(outcome.promoted, vec![SiteFile::Page]);
        assert!(outcome.failed.is_empty());
        assert_eq!(outcome.mirror_error, None);
        assert_eq!(live_page(&f), "<h1>B</h1>");

        // The snapshot preserves the pre-publish live content.
        f.pipeline.rollback(&outcome.version).unwrap();
        assert_eq!(live_page(&f), live_before);
    }

    #[test]
    fn test_publish_passes_promoted_files_to_mirror() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>"));

        f.pipeline.generate("make title B").unwrap();
        let outcome = f.pipeline.publish().unwrap();

        let commits = f.mirror.commits();
        assert_eq!(commits.len(), 1);
        let (files, message) = &commits[0];
        assert_eq!(files[&SiteFile::Page], "<h1>B</h1>");
        assert_eq!(message, &format!("Publish {}", outcome.version));
    }

    #[test]
    fn test_publish_without_preview_promotes_nothing() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "x"));
        let live_before = live_page(&f);

        let outcome = f.pipeline.publish().unwrap();

        assert!(outcome.promoted.is_empty());
        assert_eq!(live_page(&f), live_before);
    }

    #[test]
    fn test_publish_is_idempotent_on_unchanged_preview() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>"));

        f.pipeline.generate("make title B").unwrap();
        let first = f.pipeline.publish().unwrap();
        let live_after_first = live_page(&f);
        let second = f.pipeline.publish().unwrap();

        assert_eq!(live_page(&f), live_after_first);
        assert_ne!(first.version, second.version);
    }

    #[test]
    fn test_mirror_failure_does_not_fail_publish() {
        let dir = TempDir::new().unwrap();
        let site_dir = dir.path().join("site");
        let store = RevisionStore::open(&site_dir).unwrap();
        let pipeline = Pipeline::new(
            store,
            Arc::new(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>")),
            Arc::new(RecordingMirror::failing()),
            RateLimiter::new(Duration::ZERO),
        );

        pipeline.generate("make title B").unwrap();
        let outcome = pipeline.publish().unwrap();

        assert!(outcome.mirror_error.is_some());
        assert_eq!(outcome.promoted, vec![SiteFile::Page]);
        assert_eq!(
            std::fs::read_to_string(site_dir.join("live.html")).unwrap(),
            "<h1>B</h1>"
        );
    }

    #[test]
    fn test_rollback_unknown_version() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "x"));
        let live_before = live_page(&f);

        let err = f
            .pipeline
            .rollback(&VersionId::parse("1756500000").unwrap())
            .unwrap_err();

        assert!(matches!(err, PipelineError::NotFound(_)));
        assert_eq!(live_page(&f), live_before);
    }

    #[test]
    fn test_rollback_leaves_preview_alone() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>"));

        let outcome = f.pipeline.publish().unwrap();
        f.pipeline.generate("make title B").unwrap();
        f.pipeline.rollback(&outcome.version).unwrap();

        assert_eq!(preview_page(&f), Some("<h1>B</h1>".to_owned()));
    }

    #[test]
    fn test_history_lists_versions_in_order() {
        let f = fixture(MockGenerator::returning(SiteFile::Page, "x"));

        let first = f.pipeline.publish().unwrap().version;
        let second = f.pipeline.publish().unwrap().version;

        assert_eq!(f.pipeline.history().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_full_edit_cycle() {
        // Full cycle: edit staged, published, then rolled back.
        let f = fixture(MockGenerator::returning(SiteFile::Page, "<h1>B</h1>"));
        std::fs::write(f.site_dir.join("live.html"), "<h1>A</h1>").unwrap();

        f.pipeline.generate("make title B").unwrap();
        assert_eq!(live_page(&f), "<h1>A</h1>");
        assert_eq!(preview_page(&f), Some("<h1>B</h1>".to_owned()));

        let outcome = f.pipeline.publish().unwrap();
        assert_eq!(live_page(&f), "<h1>B</h1>");

        f.pipeline.rollback(&outcome.version).unwrap();
        assert_eq!(live_page(&f), "<h1>A</h1>");
    }
}
