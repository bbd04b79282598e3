//! Per-path history used by the classifier
//!
//! Each watched path keeps the timestamps last seen for it and whether a
//! Create or Delete has already been reported for the current transition.
//! The store is owned by a single stream; entries only disappear when a
//! metadata lookup for the path fails.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Last known state of a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHistory {
    /// When the most recent notification for this path was processed
    pub observed_at: SystemTime,

    /// Last known modification time (carried forward while the file is absent)
    pub last_modified_at: SystemTime,

    /// Last known creation time (carried forward while the file is absent)
    pub created_at: SystemTime,

    /// A Create was emitted for the current lifetime of the path
    pub create_emitted: bool,

    /// A Delete was emitted for the current absence of the path
    pub delete_emitted: bool,
}

impl FileHistory {
    /// History for a path that has never been seen: epoch timestamps, no flags
    pub fn unseen(observed_at: SystemTime) -> Self {
        Self {
            observed_at,
            last_modified_at: SystemTime::UNIX_EPOCH,
            created_at: SystemTime::UNIX_EPOCH,
            create_emitted: false,
            delete_emitted: false,
        }
    }
}

/// Path → history map scoped to one classification stream
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: HashMap<PathBuf, FileHistory>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&FileHistory> {
        self.entries.get(path)
    }

    /// Insert or overwrite the entry for `path`
    pub fn insert(&mut self, path: PathBuf, history: FileHistory) {
        self.entries.insert(path, history);
    }

    /// Remove the entry for `path`, returning it if present
    pub fn remove(&mut self, path: &Path) -> Option<FileHistory> {
        self.entries.remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every path
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unseen_history_is_zeroed() {
        let now = SystemTime::now();
        let history = FileHistory::unseen(now);

        assert_eq!(history.observed_at, now);
        assert_eq!(history.last_modified_at, SystemTime::UNIX_EPOCH);
        assert_eq!(history.created_at, SystemTime::UNIX_EPOCH);
        assert!(!history.create_emitted);
        assert!(!history.delete_emitted);
    }

    #[test]
    fn test_insert_overwrites_single_entry() {
        let mut store = HistoryStore::new();
        let now = SystemTime::now();
        let path = PathBuf::from("a.txt");

        store.insert(path.clone(), FileHistory::unseen(now));
        let mut updated = FileHistory::unseen(now + Duration::from_millis(10));
        updated.create_emitted = true;
        store.insert(path.clone(), updated);

        assert_eq!(store.len(), 1);
        assert!(store.get(&path).unwrap().create_emitted);
    }

    #[test]
    fn test_remove_returns_entry() {
        let mut store = HistoryStore::new();
        let path = Path::new("gone.txt");
        store.insert(path.to_path_buf(), FileHistory::unseen(SystemTime::now()));

        assert!(store.remove(path).is_some());
        assert!(store.remove(path).is_none());
        assert!(!store.contains(path));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_and_paths() {
        let mut store = HistoryStore::new();
        let now = SystemTime::now();
        store.insert(PathBuf::from("a"), FileHistory::unseen(now));
        store.insert(PathBuf::from("b"), FileHistory::unseen(now));

        let mut paths: Vec<_> = store.paths().collect();
        paths.sort();
        assert_eq!(paths, vec![Path::new("a"), Path::new("b")]);

        store.clear();
        assert!(store.is_empty());
    }
}
