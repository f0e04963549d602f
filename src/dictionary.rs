use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory dictionary mapping words to definitions.
///
/// Every access goes through one `RwLock`: `add`, `remove` and `replace` take it
/// exclusively, `get`, `snapshot` and friends take it shared. Clones share the
/// same map, so hand a clone to each worker or request handler.
#[derive(Clone, Debug, Default)]
pub struct Dictionary(Arc<RwLock<HashMap<String, String>>>);

impl Dictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Dictionary(Arc::new(RwLock::new(HashMap::new())))
    }

    /// Create a dictionary pre-populated with `words`.
    pub fn from_words(words: HashMap<String, String>) -> Self {
        Dictionary(Arc::new(RwLock::new(words)))
    }

    // A panic in another holder cannot leave the map half-written: each
    // critical section is a single insert/remove/swap.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the definition of `word`. Returns once the write is visible.
    pub fn add(&self, word: impl Into<String>, definition: impl Into<String>) {
        self.write().insert(word.into(), definition.into());
    }

    /// Delete `word`. Absent words are a no-op.
    pub fn remove(&self, word: &str) {
        self.write().remove(word);
    }

    /// Current definition of `word`, `None` when absent.
    pub fn get(&self, word: &str) -> Option<String> {
        self.read().get(word).cloned()
    }

    /// Whether `word` currently has a definition.
    pub fn contains(&self, word: &str) -> bool {
        self.read().contains_key(word)
    }

    /// Number of words currently stored.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when no words are stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Independent copy of the whole mapping, taken under a single shared lock.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.read().clone()
    }

    /// Snapshot as `(word, definition)` pairs sorted by word.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self.snapshot().into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Swap in `words` as the entire mapping. Readers see either the old or the new map.
    pub fn replace(&self, words: HashMap<String, String>) {
        *self.write() = words;
    }
}
