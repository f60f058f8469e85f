//! Persisted client state behind a tiny key-value capability
//!
//! The browser keeps the session id in `localStorage`; native front-ends use
//! a JSON file. Tests substitute `MemoryStore`.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StorageError;

/// Key-value storage the session client persists its identity into
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if a previous run had persisted `value`
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use log::warn;

    use super::KeyValueStore;
    use crate::error::StorageError;

    /// JSON object on disk, rewritten on every `set`
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
            if !self.path.exists() {
                return Ok(BTreeMap::new());
            }
            let json = fs::read_to_string(&self.path)?;
            if json.trim().is_empty() {
                return Ok(BTreeMap::new());
            }
            Ok(serde_json::from_str(&json)?)
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            match self.load() {
                Ok(values) => values.get(key).cloned(),
                Err(e) => {
                    warn!("failed to read state file {}: {}", self.path.display(), e);
                    None
                }
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            // A corrupt file is replaced rather than blocking the write
            let mut values = self.load().unwrap_or_else(|e| {
                warn!("discarding unreadable state file {}: {}", self.path.display(), e);
                BTreeMap::new()
            });
            values.insert(key.to_string(), value.to_string());

            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            let json = serde_json::to_string_pretty(&values)?;
            fs::write(&self.path, json)?;
            Ok(())
        }
    }
}
