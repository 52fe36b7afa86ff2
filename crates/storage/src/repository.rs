use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Named slots holding opaque text blobs.
///
/// Each slot is read and replaced as a whole: a `put` either lands completely or
/// not at all, so readers never observe a half-written value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the slot. Deleting a missing slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Slot storage behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryRepository::new());
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_latest_value() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get("k").await.unwrap(), None);

        repo.put("k", "one").await.unwrap();
        repo.put("k", "two").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let repo = InMemoryRepository::new();
        repo.put("k", "v").await.unwrap();
        repo.remove("k").await.unwrap();
        repo.remove("k").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_slots() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.slots.put("shared", "yes").await.unwrap();
        assert_eq!(
            other.slots.get("shared").await.unwrap().as_deref(),
            Some("yes")
        );
    }
}
