//! Offline queue domain models.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical buckets used by the app's offline-capable screens.
///
/// Advisory: the queue manager accepts any non-empty bucket name, but the
/// lesson wizard, quiz wizard, and parent messaging screens all write into
/// one of these.
pub const OFFLINE_SYNC_BUCKETS: [&str; 3] = ["lessons", "quizzes", "messages"];

/// Key prefix under which per-bucket queue lists are persisted.
const QUEUE_KEY_PREFIX: &str = "offline:";

/// A pending mutation persisted locally until the cloud API acknowledges it.
///
/// An item is either in its bucket's persisted list ("queued") or gone
/// ("removed"); there is no persisted in-flight state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Opaque unique id, creation-ordered within a bucket.
    pub id: String,
    /// Bucket this item belongs to. Items never move between buckets.
    pub bucket: String,
    /// The domain object to deliver (a lesson plan, quiz, chat message).
    /// Shape is the producing screen's concern, not the queue's.
    pub payload: serde_json::Value,
    /// RFC3339 enqueue timestamp. Ordering and diagnostics only, never expiry.
    pub created_at: String,
}

impl QueueItem {
    /// Build a fresh item for `bucket`, stamped with a new id and timestamp.
    pub fn new(bucket: impl Into<String>, payload: serde_json::Value) -> Self {
        let bucket = bucket.into();
        Self {
            id: next_queue_item_id(&bucket),
            bucket,
            payload,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Outcome counts for one sync pass over a bucket.
///
/// Failed items remain queued for a future pass; screens render this as
/// "3 synced, 1 failed, will retry later".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub success: usize,
    pub failed: usize,
}

/// Storage key under which `bucket`'s queue list is persisted.
pub fn queue_storage_key(bucket: &str) -> String {
    format!("{}{}", QUEUE_KEY_PREFIX, bucket)
}

/// Generate a fresh queue item id.
///
/// UUIDv7 keeps ids unique under clock coarseness and concurrent enqueues,
/// and roughly time-ordered; the bucket prefix makes collisions across
/// buckets impossible by construction. FIFO drain order itself comes from
/// list position, not from sorting ids.
pub fn next_queue_item_id(bucket: &str) -> String {
    format!("{}-{}", bucket, Uuid::now_v7())
}
