//! Durable key-value storage contract.

use async_trait::async_trait;

use crate::errors::StoreError;

/// Async durable key-value storage used to persist per-bucket queue lists.
///
/// Implementations own durability and atomicity of a single `set`; the
/// queue manager owns key namespacing, list serialization, and per-bucket
/// write serialization on top of it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value at `key`. `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` at `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
