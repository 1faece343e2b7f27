//! Persisted key-value storage.
//!
//! [`KeyValueStore`] is the async string-keyed store the daily gate and
//! session helpers write through. [`JsonFileStore`] keeps every key in one
//! JSON object file; [`MemoryStore`] keeps them in process.

use crate::error::{Result, VerseError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Async string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete `key`. Returns `true` when a value was present.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// In-process store; contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().await.remove(key).is_some())
    }
}

/// File-backed store holding all keys in a single JSON object.
///
/// Writes go to a temp file that is renamed over the target, so a crash
/// mid-write leaves the previous contents intact. A missing file reads as
/// an empty store.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(VerseError::Storage(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            VerseError::Storage(format!("cannot parse {}: {e}", self.path.display()))
        })
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                VerseError::Storage(format!("cannot create store directory: {e}"))
            })?;
        }

        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| VerseError::Storage(format!("cannot serialize store: {e}")))?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| VerseError::Storage(format!("cannot write store temp file: {e}")))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| VerseError::Storage(format!("cannot finalize store file: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        // An unreadable file is replaced rather than blocking every write.
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("discarding unreadable store contents: {e}");
                BTreeMap::new()
            }
        };
        entries.insert(key.to_owned(), value);
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        Ok(true)
    }
}
