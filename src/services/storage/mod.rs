//! Key-value storage for small pieces of board state that outlive a session
//! (selected catalog category, starred leg).
//!
//! The store is injected so board logic can be tested with [`MemoryStore`]
//! instead of touching the filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::category::Category;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object; rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_string_pretty(&self.values).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Per-trip board preferences on top of a [`KeyValueStore`].
pub struct BoardPreferences {
    store: Box<dyn KeyValueStore>,
}

impl BoardPreferences {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    fn category_key(trip_id: i64) -> String {
        format!("trip:{}:category", trip_id)
    }

    fn starred_leg_key(trip_id: i64) -> String {
        format!("trip:{}:starred_leg", trip_id)
    }

    pub fn selected_category(&self, trip_id: i64) -> Category {
        self.store
            .get(&Self::category_key(trip_id))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_selected_category(&mut self, trip_id: i64, category: Category) {
        if let Err(err) = self
            .store
            .set(&Self::category_key(trip_id), category.as_str().to_string())
        {
            log::warn!("Failed to remember selected category: {}", err);
        }
    }

    pub fn starred_leg(&self, trip_id: i64) -> Option<i64> {
        self.store
            .get(&Self::starred_leg_key(trip_id))
            .and_then(|raw| raw.parse().ok())
    }

    /// Star `leg_id`, or clear the star when it is already the starred leg.
    pub fn toggle_starred_leg(&mut self, trip_id: i64, leg_id: i64) -> Option<i64> {
        let key = Self::starred_leg_key(trip_id);
        let result = if self.starred_leg(trip_id) == Some(leg_id) {
            self.store.remove(&key).map(|_| None)
        } else {
            self.store.set(&key, leg_id.to_string()).map(|_| Some(leg_id))
        };
        result.unwrap_or_else(|err| {
            log::warn!("Failed to update starred leg: {}", err);
            self.starred_leg(trip_id)
        })
    }
}
