//! Key-value persistence for favorites and recent searches.
//!
//! `KvStore` is the raw string port; `JsonKv` layers JSON encoding on top and
//! recovers from values that no longer decode.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::StorageError;

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir` for storage, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write beside the target and rename so a crash never leaves half a file
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Poisoning is ignored: every write is a single insert or remove
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}

/// A typed JSON value stored under a fixed key.
pub struct JsonKv<S> {
    store: S,
    key: &'static str,
}

impl<S: KvStore> JsonKv<S> {
    pub fn new(store: S, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read and decode the stored value.
    ///
    /// A value that fails to decode is removed and treated as absent. A store
    /// that cannot be read at all is logged and also treated as absent.
    pub fn read<T: DeserializeOwned>(&self) -> Option<T> {
        let text = match self.store.get(self.key) {
            Ok(text) => text?,
            Err(e) => {
                tracing::error!("Could not read {}, starting empty: {}", self.key, e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Stored {} is corrupt, clearing it: {}", self.key, e);
                if let Err(e) = self.store.remove(self.key) {
                    tracing::error!("Could not clear corrupt {}: {}", self.key, e);
                }
                None
            }
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        self.store.set(self.key, &text)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested")).unwrap();
        assert_eq!(store.get("favorites").unwrap(), None);
        store.set("favorites", "[1,2]").unwrap();
        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[1,2]"));
        assert!(store.dir().join("favorites.json").exists());
        store.remove("favorites").unwrap();
        store.remove("favorites").unwrap();
        assert_eq!(store.get("favorites").unwrap(), None);
    }

    #[test]
    fn file_store_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.set("k", "\"v\"").unwrap();
        store.set("k", "\"w\"").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn json_kv_reads_what_it_wrote() {
        let kv = JsonKv::new(MemoryStore::new(), "list");
        assert_eq!(kv.read::<Vec<String>>(), None);
        kv.write(&vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(
            kv.read::<Vec<String>>(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn json_kv_clears_corrupt_value() {
        let store = Arc::new(MemoryStore::new());
        store.set("list", "{not json").unwrap();
        let kv = JsonKv::new(store.clone(), "list");
        assert_eq!(kv.read::<Vec<String>>(), None);
        assert_eq!(store.get("list").unwrap(), None);
    }

    #[test]
    fn json_kv_clears_value_of_wrong_shape() {
        let store = Arc::new(MemoryStore::new());
        store.set("list", r#"{"a": 1}"#).unwrap();
        let kv = JsonKv::new(store.clone(), "list");
        assert_eq!(kv.read::<Vec<String>>(), None);
        assert_eq!(store.get("list").unwrap(), None);
    }
}
