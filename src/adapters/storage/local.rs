//! Local filesystem object storage.
//!
//! Development/test stand-in for the hosted object store. Uses a
//! write-to-temp-then-rename pattern so a crash mid-write never leaves a
//! partial document at the final path.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{ObjectStorage, StorageError};

pub struct LocalObjectStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(base_path: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn final_path(&self, category: &str, filename: &str) -> PathBuf {
        self.base_path.join(category).join(filename)
    }

    /// Content checksum recorded in logs for later integrity checks.
    fn checksum(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn store(
        &self,
        bytes: Vec<u8>,
        category: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let dir = self.base_path.join(category);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(format!("create {}: {}", dir.display(), e)))?;

        let final_path = self.final_path(category, filename);
        let temp_path = final_path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StorageError::io(format!("create temp file: {e}")))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| StorageError::io(format!("write: {e}")))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::io(format!("sync: {e}")))?;

        fs::rename(&temp_path, &final_path)
            .await
            .map_err(|e| StorageError::io(format!("rename into place: {e}")))?;

        tracing::debug!(
            path = %final_path.display(),
            checksum = Self::checksum(&bytes),
            "Stored object"
        );

        Ok(format!("{}/{}/{}", self.public_base_url, category, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_bytes_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "https://files.example");

        let url = storage
            .store(b"contract body".to_vec(), "contracts", "c1.md")
            .await
            .unwrap();

        assert_eq!(url, "https://files.example/contracts/c1.md");
        let written = std::fs::read(dir.path().join("contracts/c1.md")).unwrap();
        assert_eq!(written, b"contract body");
    }

    #[tokio::test]
    async fn no_temp_file_remains_after_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "https://files.example");

        storage
            .store(b"x".to_vec(), "contracts", "c2.md")
            .await
            .unwrap();

        assert!(!dir.path().join("contracts/c2.tmp").exists());
        assert!(dir.path().join("contracts/c2.md").exists());
    }

    #[tokio::test]
    async fn overwrites_existing_object_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "https://files.example");

        storage.store(b"v1".to_vec(), "contracts", "c3.md").await.unwrap();
        storage.store(b"v2".to_vec(), "contracts", "c3.md").await.unwrap();

        let written = std::fs::read(dir.path().join("contracts/c3.md")).unwrap();
        assert_eq!(written, b"v2");
    }
}
