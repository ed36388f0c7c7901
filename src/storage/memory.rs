//! In-memory key/value storage.
//!
//! Values live in a `RwLock<HashMap>` and are lost when the store is dropped.
//! Reads and writes can be switched to fail, which stands in for corrupt or
//! inaccessible device storage in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::{EduDashError, Result};
use crate::storage::KeyValueStore;

/// In-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    /// Stored values by key.
    values: RwLock<HashMap<String, String>>,
    /// When set, every `get` fails.
    fail_reads: AtomicBool,
    /// When set, every `set` and `remove` fails.
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored keys.
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store a raw value without going through the trait.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Read a raw value without going through the trait.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(EduDashError::persistence(key, "read failed"));
        }
        Ok(self.get_raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EduDashError::persistence(key, "write failed"));
        }
        self.insert_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EduDashError::persistence(key, "remove failed"));
        }
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
