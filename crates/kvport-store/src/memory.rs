use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Entries live behind a `RwLock`.
/// An optional byte quota (key bytes plus value bytes across all entries)
/// makes `set_item` fail the way a full host store does.
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl InMemoryStore {
    /// Create a new empty, unbounded store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// Create a new empty store that rejects writes past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Total bytes across all stored keys and values.
    pub fn total_bytes(&self) -> StoreResult<usize> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.iter().map(|(k, v)| k.len() + v.len()).sum())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(quota) = self.quota {
            let current: usize = map.iter().map(|(k, v)| k.len() + v.len()).sum();
            let replaced = map.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let required = current - replaced + key.len() + value.len();
            if required > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(key).is_some())
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.read().map_err(|_| StoreError::Poisoned)?.len())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryStore")
            .field("entry_count", &count)
            .field("quota", &self.quota)
            .finish()
    }
}
