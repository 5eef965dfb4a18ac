use crate::errors::StorageError;
use crate::storage::{JsonKv, KvStore};

pub const RECENT_SEARCHES_KEY: &str = "recipe-finder-searches";

/// Recently submitted queries, most recent first.
///
/// Queries are trimmed, an exact repeat moves to the front instead of being
/// duplicated, and the list never grows past `limit`.
pub struct RecentSearches<S> {
    kv: JsonKv<S>,
    entries: Vec<String>,
    limit: usize,
}

impl<S: KvStore> RecentSearches<S> {
    pub fn load(store: S, limit: usize) -> Self {
        let kv = JsonKv::new(store, RECENT_SEARCHES_KEY);
        let mut entries: Vec<String> = kv.read().unwrap_or_default();
        entries.truncate(limit);
        Self { kv, entries, limit }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a submitted query. Blank queries are ignored.
    pub fn record(&mut self, query: &str) -> Result<(), StorageError> {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 {
            return Ok(());
        }
        if self.entries.first().map(String::as_str) == Some(query) {
            return Ok(());
        }
        self.entries.retain(|q| q != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
        self.persist()
    }

    /// Remove the entry at `index`; out of range does nothing.
    pub fn remove(&mut self, index: usize) -> Result<(), StorageError> {
        if index >= self.entries.len() {
            return Ok(());
        }
        self.entries.remove(index);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.kv.write(&self.entries)
    }
}
