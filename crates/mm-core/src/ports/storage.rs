use async_trait::async_trait;

use super::errors::StorageError;

/// Durable string key-value storage that survives restarts.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// `Ok(None)` when the key was never written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Removes all keys in one write.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;
}
