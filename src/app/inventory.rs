//! Local file inventory
//!
//! The inventory is a snapshot of every bare filename under a root directory.
//! It is built lazily on the first query, exactly once, and never refreshed:
//! files created after the scan are not observed.
//!
//! Only an unreadable root is fatal. Subdirectories that cannot be read are
//! logged and skipped so a single bad permission does not abort the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::app::filter::ExtensionMatching;
use crate::errors::{InventoryError, InventoryResult};

/// Immutable set of filenames found under the inventory root
#[derive(Debug, Default, Clone)]
pub struct InventorySnapshot {
    names: HashSet<String>,
    folded: HashSet<String>,
    file_count: usize,
    skipped_dirs: Vec<PathBuf>,
}

impl InventorySnapshot {
    /// Build a snapshot from an explicit list of filenames
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut snapshot = Self::default();
        for name in names {
            snapshot.insert(name.into());
        }
        snapshot
    }

    fn insert(&mut self, name: String) {
        self.file_count += 1;
        self.folded.insert(name.to_lowercase());
        self.names.insert(name);
    }

    /// Whether a bare filename exists anywhere in the tree
    pub fn contains(&self, name: &str, matching: ExtensionMatching) -> bool {
        match matching {
            ExtensionMatching::CaseSensitive => self.names.contains(name),
            ExtensionMatching::CaseInsensitive => self.folded.contains(&name.to_lowercase()),
        }
    }

    /// Number of files seen during the scan (duplicates included)
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of distinct bare filenames
    pub fn unique_names(&self) -> usize {
        self.names.len()
    }

    /// Directories that could not be read and were skipped
    pub fn skipped_dirs(&self) -> &[PathBuf] {
        &self.skipped_dirs
    }
}

/// Lazily built, cached inventory of local filenames
#[derive(Debug)]
pub struct InventoryIndex {
    root: PathBuf,
    matching: ExtensionMatching,
    snapshot: OnceCell<InventorySnapshot>,
}

impl InventoryIndex {
    /// Create an index rooted at `root`; nothing is scanned yet
    pub fn new(root: impl Into<PathBuf>, matching: ExtensionMatching) -> Self {
        Self {
            root: root.into(),
            matching,
            snapshot: OnceCell::new(),
        }
    }

    /// Whether the snapshot has already been built
    pub fn is_cached(&self) -> bool {
        self.snapshot.initialized()
    }

    /// Get the snapshot, scanning the tree on first use
    pub async fn snapshot(&self) -> InventoryResult<&InventorySnapshot> {
        self.snapshot
            .get_or_try_init(|| Self::scan(self.root.clone()))
            .await
    }

    /// Whether `name` exists anywhere under the root
    pub async fn exists(&self, name: &str) -> InventoryResult<bool> {
        Ok(self.snapshot().await?.contains(name, self.matching))
    }

    /// Run the recursive scan on a blocking thread
    async fn scan(root: PathBuf) -> InventoryResult<InventorySnapshot> {
        info!("Caching directory list under {}", root.display());

        let snapshot = tokio::task::spawn_blocking(move || Self::scan_blocking(&root))
            .await
            .map_err(|e| InventoryError::ScanTaskFailed {
                reason: e.to_string(),
            })??;

        info!(
            "Directory list cached: {} files, {} unique names, {} directories skipped",
            snapshot.file_count(),
            snapshot.unique_names(),
            snapshot.skipped_dirs().len()
        );
        Ok(snapshot)
    }

    /// Scan `root` synchronously
    pub fn scan_blocking(root: &Path) -> InventoryResult<InventorySnapshot> {
        let entries = std::fs::read_dir(root).map_err(|source| InventoryError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut snapshot = InventorySnapshot::default();
        Self::collect_entries(entries, &mut snapshot);
        Ok(snapshot)
    }

    fn collect_entries(entries: std::fs::ReadDir, snapshot: &mut InventorySnapshot) {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            // Symlinked directories are not followed
            if file_type.is_dir() {
                Self::scan_subdirectory(&path, snapshot);
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                snapshot.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }

    fn scan_subdirectory(dir: &Path, snapshot: &mut InventorySnapshot) {
        match std::fs::read_dir(dir) {
            Ok(entries) => Self::collect_entries(entries, snapshot),
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                snapshot.skipped_dirs.push(dir.to_path_buf());
            }
        }
        debug!("Scanned {}", dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("games/arcade")).unwrap();
        std::fs::write(root.join("top.zip"), b"").unwrap();
        std::fs::write(root.join("games/b.chd"), b"").unwrap();
        std::fs::write(root.join("games/arcade/Deep Name.zip"), b"").unwrap();
        temp_dir
    }

    #[tokio::test]
    async fn test_exists_searches_whole_tree() {
        let temp_dir = create_tree();
        let index = InventoryIndex::new(temp_dir.path(), ExtensionMatching::CaseSensitive);

        assert!(index.exists("top.zip").await.unwrap());
        assert!(index.exists("b.chd").await.unwrap());
        assert!(index.exists("Deep Name.zip").await.unwrap());
        assert!(!index.exists("b.zip").await.unwrap());
        // Directories are not files
        assert!(!index.exists("games").await.unwrap());
    }

    #[tokio::test]
    async fn test_snapshot_is_built_lazily_and_once() {
        let temp_dir = create_tree();
        let index = InventoryIndex::new(temp_dir.path(), ExtensionMatching::CaseSensitive);
        assert!(!index.is_cached());

        assert!(!index.exists("late.zip").await.unwrap());
        assert!(index.is_cached());

        // Files created after the scan are not observed
        std::fs::write(temp_dir.path().join("late.zip"), b"").unwrap();
        assert!(!index.exists("late.zip").await.unwrap());
    }

    #[tokio::test]
    async fn test_case_insensitive_lookup() {
        let temp_dir = create_tree();
        let sensitive = InventoryIndex::new(temp_dir.path(), ExtensionMatching::CaseSensitive);
        let insensitive = InventoryIndex::new(temp_dir.path(), ExtensionMatching::CaseInsensitive);

        assert!(!sensitive.exists("B.CHD").await.unwrap());
        assert!(insensitive.exists("B.CHD").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let index = InventoryIndex::new(
            temp_dir.path().join("does-not-exist"),
            ExtensionMatching::CaseSensitive,
        );

        match index.exists("a.zip").await {
            Err(InventoryError::RootUnreadable { .. }) => {}
            other => panic!("Expected RootUnreadable, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_counted() {
        let temp_dir = create_tree();
        std::fs::write(temp_dir.path().join("games/top.zip"), b"").unwrap();

        let snapshot = InventoryIndex::scan_blocking(temp_dir.path()).unwrap();
        assert_eq!(snapshot.file_count(), 4);
        assert_eq!(snapshot.unique_names(), 3);
        assert!(snapshot.skipped_dirs().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = create_tree();
        let locked = temp_dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("hidden.zip"), b"").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root can still read everything, so only assert when the lock took effect
        let lock_effective = std::fs::read_dir(&locked).is_err();
        let result = InventoryIndex::scan_blocking(temp_dir.path());

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        let snapshot = result.expect("a locked subdirectory must not abort the scan");
        for name in ["top.zip", "b.chd", "Deep Name.zip"] {
            assert!(snapshot.contains(name, ExtensionMatching::CaseSensitive));
        }
        if lock_effective {
            assert_eq!(snapshot.skipped_dirs(), &[locked]);
            assert!(!snapshot.contains("hidden.zip", ExtensionMatching::CaseSensitive));
        }
    }

    #[test]
    fn test_failed_subdirectory_is_recorded_and_scan_continues() {
        let temp_dir = create_tree();
        let gone = temp_dir.path().join("gone");

        let mut snapshot = InventorySnapshot::default();
        InventoryIndex::scan_subdirectory(&gone, &mut snapshot);
        InventoryIndex::scan_subdirectory(temp_dir.path(), &mut snapshot);

        assert_eq!(snapshot.skipped_dirs(), &[gone]);
        assert_eq!(snapshot.file_count(), 3);
        for name in ["top.zip", "b.chd", "Deep Name.zip"] {
            assert!(snapshot.contains(name, ExtensionMatching::CaseSensitive));
        }
    }

    #[test]
    fn test_snapshot_from_names() {
        let snapshot = InventorySnapshot::from_names(["a.zip", "b.chd"]);
        assert!(snapshot.contains("a.zip", ExtensionMatching::CaseSensitive));
        assert!(!snapshot.contains("A.ZIP", ExtensionMatching::CaseSensitive));
        assert!(snapshot.contains("A.ZIP", ExtensionMatching::CaseInsensitive));
    }
}
