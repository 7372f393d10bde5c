//! File-based key-value store
//!
//! Persists all keys as one JSON object in the application data directory. Every
//! mutation rewrites the whole file through a temp file and a rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mm_core::ports::{KeyValueStorePort, StorageError};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_STORE_FILE: &str = "storage.json";

pub struct FileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_defaults(base_dir: &Path) -> Self {
        Self::new(base_dir.join(DEFAULT_STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Io(format!(
                    "create storage dir failed: {}: {e}",
                    parent.display()
                ))
            })?;
        }
        Ok(())
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            StorageError::Io(format!("read {} failed: {e}", self.path.display()))
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupt(format!("Failed to parse key-value store: {e}")))
    }

    async fn atomic_write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Io(format!("Failed to serialize key-value store: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await.map_err(|e| {
            StorageError::Io(format!("write temp store failed: {}: {e}", tmp_path.display()))
        })?;

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StorageError::Io(format!(
                "rename temp store to target failed: {} -> {}: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.atomic_write(&entries).await?;
        debug!(key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key]).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before {
            return Ok(());
        }
        self.atomic_write(&entries).await?;
        debug!(?keys, "Removed values");
        Ok(())
    }
}
