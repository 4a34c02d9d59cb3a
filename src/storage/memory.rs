//! In-Memory Storage Implementation
//!
//! Provides a key-value map for testing and short-lived sessions.
//! Data is lost when the process exits.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::traits::{KeyValueStorage, StorageError, StorageResult};

/// In-memory key-value storage
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what a store wrote.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total bytes of keys plus values
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create a new empty storage without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty storage that rejects writes past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> StorageResult<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Total bytes used by keys and values
    pub fn used_bytes(&self) -> StorageResult<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.iter().map(|(k, v)| k.len() + v.len()).sum())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > quota {
                tracing::warn!(key, requested, quota, "Rejected write over storage quota");
                return Err(StorageError::QuotaExceeded { requested, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
