//! In-memory storage backend.
//!
//! Used by tests and dev mode; nothing survives the process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::backend::StorageBackend;
use crate::error::StorageError;

/// A shared in-memory key-value store.
///
/// Clones share the same underlying map, mirroring how persistent backends
/// share one database.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_lock_poisoned() -> StorageError {
        StorageError::Io("memory backend lock poisoned".to_string())
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| Self::read_lock_poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Self::read_lock_poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Self::read_lock_poisoned())?;
        entries.remove(key);
        Ok(())
    }
}
