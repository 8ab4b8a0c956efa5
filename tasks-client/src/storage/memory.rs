//! In-memory storage backend.
//!
//! Nothing survives the process. Used by tests (with injectable write
//! failures) and by hosts that run without a data directory.

use super::{validate_key, DurableStore};
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory key/value store.
///
/// Clones share state, so a test can keep a handle after giving one to the
/// task store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    values: HashMap<String, String>,
    writes: usize,
    fail_next_set: Option<String>,
    fail_all_sets: Option<String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing validation (e.g. a corrupt payload).
    pub fn insert_raw(&self, key: &str, value: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.values.insert(key.to_string(), value.to_string());
    }

    /// Read a raw value without going through the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.values.get(key).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.writes
    }

    /// Cause the next set() to fail with the given error.
    pub fn fail_next_set(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_set = Some(error.to_string());
    }

    /// Cause every set() to fail until cleared with `None`.
    pub fn fail_all_sets(&self, error: Option<&str>) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_all_sets = error.map(str::to_string);
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_set.take() {
            return Err(StorageError::Unavailable(error));
        }
        if let Some(error) = inner.fail_all_sets.clone() {
            return Err(StorageError::Unavailable(error));
        }

        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}
