//! Local-disk blob store rooted at a public storage directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use quire_core::error::StorageError;
use quire_core::ports::BlobStore;

use super::{generate_path, relative_path};

/// Stores blobs as files below `root`.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(relative_path(path)?))
    }
}

fn io_error(action: &str, path: &std::path::Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, namespace: &str, extension: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = generate_path(namespace, extension)?;
        let absolute = self.absolute(&path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, e))?;
        }
        fs::write(&absolute, bytes)
            .await
            .map_err(|e| io_error("write", &absolute, e))?;

        tracing::debug!(path = %path, size_bytes = bytes.len(), "Stored blob");
        Ok(path)
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let absolute = self.absolute(path)?;
        match fs::read(&absolute).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &absolute, e)),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let absolute = self.absolute(path)?;
        match fs::remove_file(&absolute).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete", &absolute, e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let absolute = self.absolute(path)?;
        fs::try_exists(&absolute)
            .await
            .map_err(|e| io_error("stat", &absolute, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let path = store.put("posts", "png", b"image-bytes").await.unwrap();
        assert!(path.starts_with("posts/"));
        assert!(dir.path().join(&path).is_file());
        assert_eq!(store.read(&path).await.unwrap().as_deref(), Some(&b"image-bytes"[..]));

        store.delete(&path).await.unwrap();
        assert!(!store.exists(&path).await.unwrap());
        assert_eq!(store.read(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        store.delete("posts/never-written.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("public"));

        assert!(matches!(
            store.read("../outside.txt").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
