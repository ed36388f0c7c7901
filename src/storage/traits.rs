//! Key/value persistence trait for EduDash.
//!
//! Every aggregate is stored under its own key as a serialized string. The
//! trait knows nothing about the shapes it stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for key/value persistence backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`.
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Blanket implementation of KeyValueStore for Arc-wrapped stores.
///
/// Lets tests keep a handle on the backing store while the state store owns
/// another.
#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Test utilities for KeyValueStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;

    /// Exercise get/set/remove against any implementation.
    pub async fn test_key_value_store_crud<S: KeyValueStore>(store: &S) {
        let key = "@edudash_test";

        // Initially absent
        assert!(store.get(key).await.unwrap().is_none());

        store.set(key, r#"{"a":1}"#).await.unwrap();
        assert_eq!(store.get(key).await.unwrap().as_deref(), Some(r#"{"a":1}"#));

        // Overwrite
        store.set(key, r#"{"a":2}"#).await.unwrap();
        assert_eq!(store.get(key).await.unwrap().as_deref(), Some(r#"{"a":2}"#));

        store.remove(key).await.unwrap();
        assert!(store.get(key).await.unwrap().is_none());

        // Removing again should succeed
        store.remove(key).await.unwrap();
    }
}
