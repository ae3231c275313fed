//! JSON-file-backed persistent store.
//!
//! The whole store is a single JSON object of string values. It is loaded
//! into memory on open and rewritten after every mutation: the new contents
//! go to a temp file in the same directory, which is then renamed over the
//! original so a crash never leaves a half-written store behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// A persistent [`KeyValueStore`] held in one JSON file.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store; the file (and its parent
    /// directories) are created on the first write. A file that is not a
    /// JSON object of strings is rejected.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str::<BTreeMap<String, String>>(&text).map_err(|e| {
                    StoreError::CorruptFile {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "file store opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to a sibling temp file and rename it into place.
    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), entries = entries.len(), "file store persisted");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let previous = map.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&map) {
            // Keep memory in step with disk.
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let Some(old) = map.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&map) {
            map.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(true)
    }

    fn clear(&self) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if map.is_empty() && !self.path.exists() {
            return Ok(());
        }
        self.persist(&BTreeMap::new())?;
        map.clear();
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.keys().cloned().collect())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.read().map_err(|_| StoreError::Poisoned)?.len())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("entry_count", &count)
            .finish()
    }
}
