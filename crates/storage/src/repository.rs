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

/// Key-value store for serialized session checkpoints.
///
/// Payloads are opaque to storage; the caller owns their format.
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// Fetch the payload stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_checkpoint(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `payload` under `key`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be written.
    async fn save_checkpoint(&self, key: &str, payload: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_checkpoint(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory repository for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    checkpoints: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointRepository for InMemoryRepository {
    async fn load_checkpoint(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .checkpoints
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save_checkpoint(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .checkpoints
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }

    async fn clear_checkpoint(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .checkpoints
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Repositories behind trait objects so the backend can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub checkpoints: Arc<dyn CheckpointRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(InMemoryRepository::new());
        Self { checkpoints }
    }
}
