//! Durable key/value storage for offline-tasks.
//!
//! The store persists two values, each as a JSON string:
//! - [`TASKS_KEY`] - the full task collection
//! - [`QUEUE_KEY`] - the pending-mutation queue
//!
//! Backends only move strings; parsing (and recovery from corrupt values)
//! is the task store's job.

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;
use async_trait::async_trait;
use std::path::Path;

/// Key under which the task collection is stored.
pub const TASKS_KEY: &str = "tasks";

/// Key under which the pending-mutation queue is stored.
pub const QUEUE_KEY: &str = "sync_queue";

/// Trait for durable storage backends.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: DurableStore + ?Sized> DurableStore for Box<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}

/// Open the backend selected in `config`, defaulting its location to
/// `data_dir`.
pub async fn open(
    config: &StorageConfig,
    data_dir: &Path,
) -> Result<Box<dyn DurableStore>, StorageError> {
    let path = config.resolve_path(data_dir);
    let store: Box<dyn DurableStore> = match config.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::File => Box::new(FileStore::open(&path).await?),
        StorageBackend::Sqlite => Box::new(SqliteStore::new(&path).await?),
    };
    tracing::debug!("Opened {:?} storage at {}", config.backend, path.display());
    Ok(store)
}

/// Check that a key is safe to use as a file name or table key.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_are_valid() {
        assert!(validate_key(TASKS_KEY).is_ok());
        assert!(validate_key(QUEUE_KEY).is_ok());
    }

    #[test]
    fn path_like_keys_are_rejected() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a.json").is_err());
    }

    #[tokio::test]
    async fn open_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            path: None,
        };
        let store = open(&config, Path::new("unused")).await.unwrap();

        store.set(TASKS_KEY, "[]").await.unwrap();
        assert_eq!(store.get(TASKS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn open_file_backend_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: None,
        };
        let store = open(&config, &dir.path().join("nested")).await.unwrap();

        store.set(QUEUE_KEY, "[]").await.unwrap();
        assert!(dir.path().join("nested").join("sync_queue.json").exists());
    }
}
