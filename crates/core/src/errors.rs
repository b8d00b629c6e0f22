//! Error types shared across Satchel crates.

use thiserror::Error;

/// Errors raised by durable key-value storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage engine failed (I/O error, disk full, corrupt file).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A persisted value could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
