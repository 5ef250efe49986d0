//! Key-value persistence port interface

use async_trait::async_trait;
use thiserror::Error;

/// Persistence errors
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Failed to encode value: {0}")]
    Encode(String),
}

/// Port for a local string key-value store. Last write wins.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Read the value stored under `key`; `Ok(None)` when absent
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Overwrite the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
