//! Durable key-value storage for per-game data
//!
//! Every store instance is scoped to a single game: two games never see
//! each other's keys even when they use the same key name.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage file {path:?} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage is unavailable")]
    Unavailable,
}

/// String key-value storage scoped to one game
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same map, which lets a test play two
/// sessions against the "same" storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Unavailable)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by one JSON object file per game: `<data_dir>/<game>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: &Path, game: &str) -> Self {
        Self {
            path: data_dir.join(format!("{game}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.read_map()?;
        Ok(map.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every future save.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), Value::String(value.to_string()));

        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&map).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("snakeHighScore", "12").unwrap();
        assert_eq!(other.get("snakeHighScore").unwrap().as_deref(), Some("12"));
        assert_eq!(other.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path(), "snake");

        assert_eq!(store.get("snakeHighScore").unwrap(), None);
        store.set("snakeHighScore", "7").unwrap();
        store.set("snakeHighScore", "9").unwrap();

        let reopened = JsonFileStore::new(dir.path(), "snake");
        assert_eq!(reopened.get("snakeHighScore").unwrap().as_deref(), Some("9"));
    }

    #[test]
    fn test_file_store_scoped_per_game() {
        let dir = TempDir::new().unwrap();
        let snake = JsonFileStore::new(dir.path(), "snake");
        let kart = JsonFileStore::new(dir.path(), "kart");

        snake.set("snakeHighScore", "3").unwrap();
        assert_eq!(kart.get("snakeHighScore").unwrap(), None);
    }

    #[test]
    fn test_file_store_reports_corruption() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path(), "snake");
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.get("snakeHighScore"),
            Err(StoreError::Corrupt { .. })
        ));

        store.set("snakeHighScore", "4").unwrap();
        assert_eq!(store.get("snakeHighScore").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn test_file_store_creates_data_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("arcade");
        let store = JsonFileStore::new(&nested, "snake");

        store.set("snakeHighScore", "1").unwrap();
        assert!(store.path().exists());
    }
}
