//! Object storage port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from storing an object.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        StorageError::Io(message.into())
    }

    pub fn upload(message: impl Into<String>) -> Self {
        StorageError::Upload(message.into())
    }
}

/// Port for durable object storage (contract documents).
///
/// Invoked during fulfillment; a failure here aborts the whole
/// fulfillment so no sale ever references a document that was not stored.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the bytes under a category (e.g. `contracts`) and returns the
    /// retrieval URL.
    async fn store(
        &self,
        bytes: Vec<u8>,
        category: &str,
        filename: &str,
    ) -> Result<String, StorageError>;
}
