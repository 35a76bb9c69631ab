//! Filesystem revision store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::site_file::SiteFile;
use crate::version::VersionId;

/// Hidden directory holding one subdirectory per snapshot.
const HISTORY_DIR: &str = ".history";

/// Prefix for snapshot staging directories. Staging names never parse as
/// version ids, so an interrupted snapshot is invisible to `list`.
const STAGING_PREFIX: &str = ".staging-";

/// Owner of all site file content: live files, preview siblings and the
/// snapshot history.
///
/// The store itself is not synchronized; callers serialize mutating
/// operations (the pipeline wraps it in a mutex).
pub struct RevisionStore {
    site_dir: PathBuf,
    history_dir: PathBuf,
}

impl RevisionStore {
    /// Open a store rooted at `site_dir`.
    ///
    /// Creates the site and history directories and seeds any missing
    /// live file with placeholder content, so a fresh deployment starts
    /// from a serviceable state.
    pub fn open(site_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let site_dir = site_dir.into();
        let history_dir = site_dir.join(HISTORY_DIR);
        fs::create_dir_all(&history_dir).map_err(|e| StoreError::io(&history_dir, e))?;

        let store = Self {
            site_dir,
            history_dir,
        };
        for file in SiteFile::ALL {
            let path = store.live_path(file);
            if !path.exists() {
                fs::write(&path, file.seed_content()).map_err(|e| StoreError::io(&path, e))?;
                debug!(file = %file, "Seeded missing live file");
            }
        }
        Ok(store)
    }

    /// Root directory of the site.
    #[must_use]
    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    /// Read the live content of one site file.
    pub fn read_live(&self, file: SiteFile) -> Result<String, StoreError> {
        let path = self.live_path(file);
        fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    /// Read the live content of every site file, fresh from disk.
    pub fn read_live_set(&self) -> Result<BTreeMap<SiteFile, String>, StoreError> {
        SiteFile::ALL
            .into_iter()
            .map(|file| Ok((file, self.read_live(file)?)))
            .collect()
    }

    /// Stage preview content for one site file, replacing any prior preview.
    pub fn write_preview(&self, file: SiteFile, content: &str) -> Result<(), StoreError> {
        let path = self.preview_path(file);
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))
    }

    /// Read staged preview content, or `None` when nothing is staged.
    pub fn read_preview(&self, file: SiteFile) -> Result<Option<String>, StoreError> {
        let path = self.preview_path(file);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Promote staged preview content into the live file.
    ///
    /// Returns the promoted content, or `None` when no preview is staged.
    /// The preview file is left in place; it is overwritten wholesale by
    /// the next generation call.
    pub fn promote(&self, file: SiteFile) -> Result<Option<String>, StoreError> {
        let Some(content) = self.read_preview(file)? else {
            return Ok(None);
        };
        let path = self.live_path(file);
        fs::write(&path, &content).map_err(|e| StoreError::io(&path, e))?;
        Ok(Some(content))
    }

    /// Snapshot the live content of every site file.
    ///
    /// The snapshot is assembled in a staging directory and renamed into
    /// place, so a failure partway never leaves a snapshot addressable
    /// under the returned id.
    pub fn snapshot(&self) -> Result<VersionId, StoreError> {
        let version = self.next_version()?;
        let staging = self
            .history_dir
            .join(format!("{STAGING_PREFIX}{version}"));

        if let Err(e) = self.stage_snapshot(&staging) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        let target = self.history_dir.join(version.as_str());
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_dir_all(&staging);
            return Err(StoreError::io(&target, e));
        }

        info!(version = %version, "Snapshot created");
        Ok(version)
    }

    /// Restore live content from a snapshot.
    ///
    /// Every site file present in the snapshot is overwritten wholesale;
    /// files absent from the snapshot are left untouched. Preview state
    /// is not affected.
    pub fn restore(&self, version: &VersionId) -> Result<(), StoreError> {
        let dir = self.history_dir.join(version.as_str());
        if !dir.is_dir() {
            return Err(StoreError::SnapshotNotFound(version.to_string()));
        }

        for file in SiteFile::ALL {
            let source = dir.join(file.name());
            if !source.exists() {
                continue;
            }
            let target = self.live_path(file);
            fs::copy(&source, &target).map_err(|e| StoreError::io(&target, e))?;
        }

        info!(version = %version, "Snapshot restored");
        Ok(())
    }

    /// List every snapshot id, in ascending creation order.
    pub fn list(&self) -> Result<Vec<VersionId>, StoreError> {
        let entries =
            fs::read_dir(&self.history_dir).map_err(|e| StoreError::io(&self.history_dir, e))?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.history_dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            // Staging leftovers and foreign directories fail to parse.
            if let Ok(version) = VersionId::parse(&name.to_string_lossy()) {
                versions.push(version);
            }
        }
        versions.sort_by_key(VersionId::as_secs);
        Ok(versions)
    }

    fn live_path(&self, file: SiteFile) -> PathBuf {
        self.site_dir.join(file.name())
    }

    fn preview_path(&self, file: SiteFile) -> PathBuf {
        self.site_dir.join(file.preview_name())
    }

    fn stage_snapshot(&self, staging: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(staging).map_err(|e| StoreError::io(staging, e))?;
        for file in SiteFile::ALL {
            let content = self.read_live(file)?;
            let path = staging.join(file.name());
            fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        }
        Ok(())
    }

    /// Next version id: wall clock seconds, bumped past the newest
    /// existing snapshot when the clock has not advanced.
    fn next_version(&self) -> Result<VersionId, StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let floor = self
            .list()?
            .last()
            .map_or(0, |newest| newest.as_secs().saturating_add(1));
        Ok(VersionId::from_secs(now.max(floor)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, RevisionStore) {
        let dir = TempDir::new().unwrap();
        let store = RevisionStore::open(dir.path().join("site")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_seeds_missing_live_files() {
        let (_dir, store) = store();
        for file in SiteFile::ALL {
            let content = store.read_live(file).unwrap();
            assert!(!content.is_empty(), "{file} should be seeded");
        }
    }

    #[test]
    fn test_open_keeps_existing_live_files() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("live.html"), "<h1>A</h1>").unwrap();

        let store = RevisionStore::open(&site).unwrap();
        assert_eq!(store.read_live(SiteFile::Page).unwrap(), "<h1>A</h1>");
    }

    #[test]
    fn test_write_preview_leaves_live_untouched() {
        let (_dir, store) = store();
        let live_before = store.read_live(SiteFile::Page).unwrap();

        store.write_preview(SiteFile::Page, "<h1>B</h1>").unwrap();

        assert_eq!(store.read_live(SiteFile::Page).unwrap(), live_before);
        assert_eq!(
            store.read_preview(SiteFile::Page).unwrap(),
            Some("<h1>B</h1>".to_owned())
        );
    }

    #[test]
    fn test_read_preview_absent() {
        let (_dir, store) = store();
        assert_eq!(store.read_preview(SiteFile::Script).unwrap(), None);
    }

    #[test]
    fn test_promote_overwrites_live() {
        let (_dir, store) = store();
        store.write_preview(SiteFile::Page, "<h1>B</h1>").unwrap();

        let promoted = store.promote(SiteFile::Page).unwrap();

        assert_eq!(promoted, Some("<h1>B</h1>".to_owned()));
        assert_eq!(store.read_live(SiteFile::Page).unwrap(), "<h1>B</h1>");
    }

    #[test]
    fn test_promote_without_preview_is_noop() {
        let (_dir, store) = store();
        let live_before = store.read_live(SiteFile::Stylesheet).unwrap();

        assert_eq!(store.promote(SiteFile::Stylesheet).unwrap(), None);
        assert_eq!(store.read_live(SiteFile::Stylesheet).unwrap(), live_before);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let (_dir, store) = store();
        store.write_preview(SiteFile::Page, "<h1>A</h1>").unwrap();
        store.promote(SiteFile::Page).unwrap();
        let before = store.read_live_set().unwrap();

        let version = store.snapshot().unwrap();

        store.write_preview(SiteFile::Page, "<h1>B</h1>").unwrap();
        store.promote(SiteFile::Page).unwrap();
        assert_ne!(store.read_live_set().unwrap(), before);

        store.restore(&version).unwrap();
        assert_eq!(store.read_live_set().unwrap(), before);
    }

    #[test]
    fn test_restore_unknown_version() {
        let (_dir, store) = store();
        let before = store.read_live_set().unwrap();

        let err = store.restore(&VersionId::parse("123456").unwrap()).unwrap_err();

        assert!(matches!(err, StoreError::SnapshotNotFound(_)));
        assert_eq!(store.read_live_set().unwrap(), before);
    }

    #[test]
    fn test_restore_does_not_touch_preview() {
        let (_dir, store) = store();
        let version = store.snapshot().unwrap();
        store.write_preview(SiteFile::Page, "staged").unwrap();

        store.restore(&version).unwrap();

        assert_eq!(
            store.read_preview(SiteFile::Page).unwrap(),
            Some("staged".to_owned())
        );
    }

    #[test]
    fn test_snapshot_ids_strictly_increase() {
        let (_dir, store) = store();
        let first = store.snapshot().unwrap();
        let second = store.snapshot().unwrap();
        let third = store.snapshot().unwrap();

        assert!(second.as_secs() > first.as_secs());
        assert!(third.as_secs() > second.as_secs());
    }

    #[test]
    fn test_list_is_ordered_and_complete() {
        let (_dir, store) = store();
        let first = store.snapshot().unwrap();
        let second = store.snapshot().unwrap();

        assert_eq!(store.list().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_list_skips_staging_leftovers() {
        let (_dir, store) = store();
        let version = store.snapshot().unwrap();
        fs::create_dir_all(store.history_dir.join(".staging-99")).unwrap();

        assert_eq!(store.list().unwrap(), vec![version]);
    }

    #[test]
    fn test_snapshot_contains_every_site_file() {
        let (_dir, store) = store();
        let version = store.snapshot().unwrap();

        let dir = store.history_dir.join(version.as_str());
        for file in SiteFile::ALL {
            assert!(dir.join(file.name()).is_file(), "{file} missing");
        }
    }
}
