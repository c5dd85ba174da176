//! In-memory blob store, used when no storage directory is wanted (tests).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quire_core::error::StorageError;
use quire_core::ports::BlobStore;

use super::{generate_path, relative_path};

#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, namespace: &str, extension: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = generate_path(namespace, extension)?;
        self.blobs.write().await.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError> {
        relative_path(path)?;
        Ok(self.blobs.read().await.get(path).cloned())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        relative_path(path)?;
        self.blobs.write().await.remove(path);
        Ok(())
    }
}
