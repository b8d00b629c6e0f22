//! Error types for the offline queue manager.

use thiserror::Error;

use satchel_core::errors::StoreError;

/// Result type alias for offline queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Precondition failures of the queue manager's own operations.
///
/// Per-item delivery outcomes during a sync pass are data in the
/// [`SyncReport`](satchel_core::sync::SyncReport), never errors: partial
/// success is an ordinary result there.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The bucket's persisted list could not be read back or rewritten.
    /// The screen must tell the user the item was not saved.
    #[error("Offline queue storage write failed: {0}")]
    StorageWrite(#[from] StoreError),

    /// `sync` was invoked while the connectivity provider reports offline.
    /// No partial work was performed.
    #[error("Device is offline; sync not attempted")]
    Offline,

    /// Bucket names must be non-empty.
    #[error("Invalid bucket name: {0:?}")]
    InvalidBucket(String),
}
