//! Blob stores for uploaded files.

mod local;
mod memory;

pub use local::LocalBlobStore;
pub use memory::InMemoryBlobStore;

use std::path::{Component, Path, PathBuf};

use quire_core::error::StorageError;
use uuid::Uuid;

/// Generate a fresh relative path `<namespace>/<32 hex>.<extension>`.
fn generate_path(namespace: &str, extension: &str) -> Result<String, StorageError> {
    let name = Uuid::new_v4().simple();
    let path = if extension.is_empty() {
        format!("{namespace}/{name}")
    } else {
        format!("{namespace}/{name}.{extension}")
    };
    // Validates the namespace as well.
    relative_path(&path)?;
    Ok(path)
}

/// Check that `path` is a plain relative path and return it as a `PathBuf`.
fn relative_path(path: &str) -> Result<PathBuf, StorageError> {
    let candidate = Path::new(path);
    let mut normalized = PathBuf::new();

    for component in candidate.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            _ => return Err(StorageError::InvalidPath(path.to_string())),
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    Ok(normalized)
}
