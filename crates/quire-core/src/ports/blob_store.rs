//! Blob storage port - where uploaded files live, addressed by relative path.

use async_trait::async_trait;

use crate::error::StorageError;

/// Blob store trait - abstraction over file backends (local disk, in-memory).
///
/// Paths are relative, `/`-separated and never contain `..`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `namespace` with a generated name and return its path.
    async fn put(&self, namespace: &str, extension: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Read a blob, `None` if nothing is stored at `path`.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Delete a blob. Deleting a missing blob succeeds.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.read(path).await?.is_some())
    }
}
