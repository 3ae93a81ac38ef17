// history.rs

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

pub const DEFAULT_MAX_ENTRIES: usize = 50;
pub const DEFAULT_HISTORY_KEY: &str = "terminalCommandHistory";

/// Chronological list of submitted command lines.
///
/// Adjacent repeats are suppressed and the list is capped, dropping the
/// oldest lines first. Every change is written through to the backing
/// store as a JSON array of strings; storage failures are logged and the
/// store keeps working from memory.
pub struct HistoryStore {
    entries: Vec<String>,
    max_entries: usize,
    key: String,
    storage: Box<dyn KeyValueStore>,
    hydrated: bool,
}

impl HistoryStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_limits(storage, DEFAULT_HISTORY_KEY, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_limits(
        storage: Box<dyn KeyValueStore>,
        key: &str,
        max_entries: usize,
    ) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
            key: key.to_string(),
            storage,
            hydrated: false,
        }
    }

    /// Appends `line` unless it is blank or repeats the newest entry.
    /// Returns whether anything was recorded.
    pub fn record(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        self.hydrate();
        if self.entries.last().map(String::as_str) == Some(line) {
            return false;
        }
        self.entries.push(line.to_string());
        self.truncate();
        self.persist();
        true
    }

    pub fn all(&mut self) -> &[String] {
        self.hydrate();
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn truncate(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    fn hydrate(&mut self) {
        if self.hydrated || !self.entries.is_empty() {
            return;
        }
        self.hydrated = true;
        match self.load() {
            Ok(entries) => {
                debug!(count = entries.len(), key = %self.key, "loaded command history");
                self.entries = entries;
                self.truncate();
            }
            Err(e) => warn!(key = %self.key, error = %e, "error loading command history"),
        }
    }

    fn load(&self) -> Result<Vec<String>, StorageError> {
        match self.storage.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(&self.key, &raw));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "error saving command history");
        }
    }
}

/// Up/Down recall over a snapshot of the history.
///
/// `None` means "not recalling"; otherwise the index counts back from the
/// newest entry (0 = newest).
#[derive(Debug, Default, Clone)]
pub struct Recall {
    entries: Vec<String>,
    index: Option<usize>,
}

impl Recall {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries, index: None }
    }

    /// Called on every submission.
    pub fn reset(&mut self, entries: Vec<String>) {
        self.entries = entries;
        self.index = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Steps to an older entry, sticking at the oldest. `None` leaves the
    /// input untouched.
    pub fn up(&mut self) -> Option<String> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let next = match self.index {
            None => 0,
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
        };
        self.index = Some(next);
        Some(self.entry(next))
    }

    /// Steps to a newer entry; past the newest the input is cleared and
    /// recall ends.
    pub fn down(&mut self) -> Option<String> {
        match self.index {
            None => None,
            Some(0) => {
                self.index = None;
                Some(String::new())
            }
            Some(i) => {
                self.index = Some(i - 1);
                Some(self.entry(i - 1))
            }
        }
    }

    fn entry(&self, back: usize) -> String {
        self.entries[self.entries.len() - 1 - back].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Storage whose contents stay inspectable after the store takes it.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<MemoryStorage>>);

    impl KeyValueStore for Shared {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    struct Broken;

    impl KeyValueStore for Broken {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("unavailable")))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("unavailable")))
        }
    }

    fn store() -> HistoryStore {
        HistoryStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn suppresses_adjacent_repeats() {
        let mut h = store();
        assert!(h.record("ls"));
        assert!(!h.record("ls"));
        assert!(!h.record("  ls  "));
        assert_eq!(h.len(), 1);
        assert!(h.record("pwd"));
        assert!(h.record("ls"));
        assert_eq!(h.all(), ["ls", "pwd", "ls"]);
    }

    #[test]
    fn ignores_blank_lines() {
        let mut h = store();
        assert!(!h.record(""));
        assert!(!h.record("   "));
        assert!(h.all().is_empty());
    }

    #[test]
    fn drops_oldest_entries_past_the_cap() {
        let mut h = HistoryStore::with_limits(Box::new(MemoryStorage::new()), "k", 3);
        for cmd in ["a", "b", "c", "d", "e"] {
            h.record(cmd);
        }
        assert_eq!(h.all(), ["c", "d", "e"]);
    }

    #[test]
    fn never_exceeds_default_cap() {
        let mut h = store();
        for i in 0..(DEFAULT_MAX_ENTRIES + 20) {
            h.record(&format!("echo {}", i));
            assert!(h.len() <= DEFAULT_MAX_ENTRIES);
        }
        assert_eq!(h.all().first().map(String::as_str), Some("echo 20"));
    }

    #[test]
    fn persists_and_rehydrates() {
        let shared = Shared::default();
        let mut h = HistoryStore::new(Box::new(shared.clone()));
        h.record("ls");
        h.record("cd about");
        assert_eq!(
            shared.get(DEFAULT_HISTORY_KEY).unwrap().as_deref(),
            Some(r#"["ls","cd about"]"#)
        );

        let mut reloaded = HistoryStore::new(Box::new(shared));
        assert_eq!(reloaded.all(), ["ls", "cd about"]);
    }

    #[test]
    fn recording_first_keeps_persisted_entries() {
        let shared = Shared::default();
        shared
            .0
            .borrow_mut()
            .set(DEFAULT_HISTORY_KEY, r#"["help"]"#)
            .unwrap();
        let mut h = HistoryStore::new(Box::new(shared));
        h.record("ls");
        assert_eq!(h.all(), ["help", "ls"]);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let shared = Shared::default();
        shared
            .0
            .borrow_mut()
            .set(DEFAULT_HISTORY_KEY, "{not json")
            .unwrap();
        let mut h = HistoryStore::new(Box::new(shared));
        assert!(h.all().is_empty());
        assert!(h.record("ls"));
        assert_eq!(h.all(), ["ls"]);
    }

    #[test]
    fn unavailable_storage_degrades_to_memory() {
        let mut h = HistoryStore::new(Box::new(Broken));
        assert!(h.all().is_empty());
        assert!(h.record("ls"));
        assert!(h.record("pwd"));
        assert_eq!(h.all(), ["ls", "pwd"]);
    }

    #[test]
    fn recall_walks_back_then_forward() {
        let mut r = Recall::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(r.up().as_deref(), Some("c"));
        assert_eq!(r.up().as_deref(), Some("b"));
        assert_eq!(r.up().as_deref(), Some("a"));
        assert_eq!(r.up().as_deref(), Some("a"));
        assert_eq!(r.index(), Some(2));
        assert_eq!(r.down().as_deref(), Some("b"));
        assert_eq!(r.down().as_deref(), Some("c"));
        assert_eq!(r.down().as_deref(), Some(""));
        assert_eq!(r.index(), None);
        assert_eq!(r.down(), None);
    }

    #[test]
    fn recall_on_empty_history_is_inert() {
        let mut r = Recall::default();
        assert_eq!(r.up(), None);
        assert_eq!(r.down(), None);
    }

    #[test]
    fn reset_ends_recall() {
        let mut r = Recall::new(vec!["a".into()]);
        r.up();
        r.reset(vec!["a".into(), "b".into()]);
        assert_eq!(r.index(), None);
        assert_eq!(r.up().as_deref(), Some("b"));
    }
}
