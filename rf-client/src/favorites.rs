use rf::Recipe;

use crate::errors::StorageError;
use crate::notify::Notice;
use crate::storage::{JsonKv, KvStore};

pub const FAVORITES_KEY: &str = "favorites";

/// What a favorites mutation actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
    Unchanged,
}

impl FavoriteChange {
    /// The notice to show for this change, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            FavoriteChange::Added => Some(Notice::success("Recipe added to favorites")),
            FavoriteChange::Removed => Some(Notice::info("Recipe removed from favorites")),
            FavoriteChange::Unchanged => None,
        }
    }
}

/// Saved recipes, unique by `uri`, in the order they were added.
///
/// The full list is written back to the store after every change. The
/// in-memory list only changes once that write has succeeded.
pub struct Favorites<S> {
    kv: JsonKv<S>,
    entries: Vec<Recipe>,
}

impl<S: KvStore> Favorites<S> {
    /// Load favorites from the store. Corrupt stored data starts an empty list.
    pub fn load(store: S) -> Self {
        let kv = JsonKv::new(store, FAVORITES_KEY);
        let entries: Vec<Recipe> = kv.read().unwrap_or_default();
        tracing::debug!("Loaded {} favorites", entries.len());
        Self { kv, entries }
    }

    pub fn entries(&self) -> &[Recipe] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, uri: &str) -> Option<&Recipe> {
        self.entries.iter().find(|r| r.uri == uri)
    }

    pub fn is_favorite(&self, uri: &str) -> bool {
        self.get(uri).is_some()
    }

    pub fn add(&mut self, recipe: Recipe) -> Result<FavoriteChange, StorageError> {
        if self.is_favorite(&recipe.uri) {
            return Ok(FavoriteChange::Unchanged);
        }
        let mut entries = self.entries.clone();
        entries.push(recipe);
        self.replace(entries)?;
        Ok(FavoriteChange::Added)
    }

    pub fn remove(&mut self, uri: &str) -> Result<FavoriteChange, StorageError> {
        if !self.is_favorite(uri) {
            return Ok(FavoriteChange::Unchanged);
        }
        let entries = self
            .entries
            .iter()
            .filter(|r| r.uri != uri)
            .cloned()
            .collect();
        self.replace(entries)?;
        Ok(FavoriteChange::Removed)
    }

    pub fn toggle(&mut self, recipe: &Recipe) -> Result<FavoriteChange, StorageError> {
        if self.is_favorite(&recipe.uri) {
            self.remove(&recipe.uri)
        } else {
            self.add(recipe.clone())
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.replace(vec![])
    }

    fn replace(&mut self, entries: Vec<Recipe>) -> Result<(), StorageError> {
        self.kv.write(&entries)?;
        self.entries = entries;
        Ok(())
    }
}
