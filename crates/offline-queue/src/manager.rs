//! Durable, bucketed FIFO queue of pending mutations with online sync.

use log::{debug, error, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use satchel_core::errors::StoreError;
use satchel_core::sync::{
    queue_storage_key, ConnectivityProvider, KeyValueStore, QueueItem, SyncDelivery, SyncReport,
};

use crate::error::{QueueError, Result};

/// Durable offline queue manager.
///
/// Guarantees that a mutation requested while offline (or deferred by the
/// caller) is not lost, and is eventually delivered to the cloud API at
/// least once. Each bucket's items persist as a JSON list under
/// `offline:<bucket>`; the manager is the sole reader/writer of those keys.
///
/// Delivery is at-least-once: the only dedup is removing an item once the
/// server acknowledges it. Callers decide when to invoke [`sync`], on a
/// connectivity-restored event or manually; the manager never
/// self-schedules retries.
///
/// [`sync`]: OfflineQueueManager::sync
pub struct OfflineQueueManager {
    store: Arc<dyn KeyValueStore>,
    delivery: Arc<dyn SyncDelivery>,
    connectivity: Arc<dyn ConnectivityProvider>,
    /// Per-bucket write locks. Every read-modify-write of a bucket's
    /// persisted list runs under that bucket's lock, so interleaved
    /// enqueue/remove/sync calls on one bucket cannot lose updates.
    bucket_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OfflineQueueManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        delivery: Arc<dyn SyncDelivery>,
        connectivity: Arc<dyn ConnectivityProvider>,
    ) -> Self {
        Self {
            store,
            delivery,
            connectivity,
            bucket_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Last-known connectivity state.
    ///
    /// Advisory: only the entry guard for [`sync`](Self::sync) trusts it;
    /// delivery attempts treat transport failures as per-item failures
    /// rather than consulting this flag.
    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Append a payload to `bucket`'s queue and return the new item's id.
    ///
    /// Once this returns, the item is durably recorded: a fresh manager
    /// over the same store observes it. Payload shape is the caller's
    /// responsibility; the queue stores it verbatim.
    pub async fn enqueue(&self, bucket: &str, payload: serde_json::Value) -> Result<String> {
        if bucket.trim().is_empty() {
            return Err(QueueError::InvalidBucket(bucket.to_string()));
        }

        let lock = self.bucket_lock(bucket).await;
        let _guard = lock.lock().await;

        // A failed read also fails the enqueue: rewriting from a fabricated
        // empty list would destroy whatever is already queued.
        let mut items = self.load_bucket(bucket).await?;
        let item = QueueItem::new(bucket, payload);
        let id = item.id.clone();
        items.push(item);
        self.write_bucket(bucket, &items).await?;

        debug!(
            "Enqueued {} into '{}' ({} pending)",
            id,
            bucket,
            items.len()
        );
        Ok(id)
    }

    /// Read `bucket`'s queued items in enqueue order.
    ///
    /// Best-effort: storage failures are logged and reported as an empty
    /// list, so badge counts keep rendering through a storage outage.
    /// Unknown buckets read as empty, never as an error.
    pub async fn get_queue(&self, bucket: &str) -> Vec<QueueItem> {
        match self.load_bucket(bucket).await {
            Ok(items) => items,
            Err(err) => {
                warn!("Failed to read offline queue '{}': {}", bucket, err);
                Vec::new()
            }
        }
    }

    /// Number of items currently queued in `bucket`.
    pub async fn queue_count(&self, bucket: &str) -> usize {
        self.get_queue(bucket).await.len()
    }

    /// Remove one item by id. Removing an absent id is a no-op.
    pub async fn remove_from_queue(&self, bucket: &str, id: &str) -> Result<()> {
        let lock = self.bucket_lock(bucket).await;
        let _guard = lock.lock().await;
        self.remove_locked(bucket, id).await
    }

    /// Drop `bucket`'s entire queue without attempting delivery.
    pub async fn clear_queue(&self, bucket: &str) -> Result<()> {
        let lock = self.bucket_lock(bucket).await;
        let _guard = lock.lock().await;
        self.store
            .remove(&queue_storage_key(bucket))
            .await
            .map_err(QueueError::from)
    }

    /// Drain a snapshot of `bucket` against the cloud API.
    ///
    /// Fails with [`QueueError::Offline`] before touching storage or the
    /// network when the connectivity provider reports offline.
    ///
    /// Items are attempted strictly in enqueue order, one awaited request
    /// at a time. Each acknowledged item is removed from the store before
    /// the next attempt, so a crash mid-pass neither re-delivers
    /// acknowledged items nor drops untried ones. A failed item stays
    /// queued untouched and the pass moves on to the next; failures are
    /// counted in the report, not raised. Items enqueued while the pass
    /// runs are not part of its snapshot and wait for the next call.
    pub async fn sync(&self, bucket: &str) -> Result<SyncReport> {
        if !self.is_online() {
            return Err(QueueError::Offline);
        }

        let snapshot = {
            let lock = self.bucket_lock(bucket).await;
            let _guard = lock.lock().await;
            self.load_bucket(bucket).await?
        };
        if snapshot.is_empty() {
            return Ok(SyncReport::default());
        }

        debug!("Syncing {} item(s) from '{}'", snapshot.len(), bucket);
        let mut report = SyncReport::default();
        for item in &snapshot {
            match self.delivery.deliver(bucket, &item.payload).await {
                Ok(()) => {
                    report.success += 1;
                    // Acknowledged: drop it before the next attempt. If this
                    // write fails the item stays queued and a later pass may
                    // re-deliver it; at-least-once is the contract.
                    let lock = self.bucket_lock(bucket).await;
                    let _guard = lock.lock().await;
                    if let Err(err) = self.remove_locked(bucket, &item.id).await {
                        error!(
                            "Delivered {} from '{}' but failed to remove it: {}",
                            item.id, bucket, err
                        );
                    }
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        "Delivery of {} from '{}' failed ({:?}): {}",
                        item.id,
                        bucket,
                        err.retry_class(),
                        err
                    );
                }
            }
        }

        debug!(
            "Sync pass over '{}' done: {} ok, {} failed",
            bucket, report.success, report.failed
        );
        Ok(report)
    }

    /// Remove `id` from `bucket`. Caller must hold the bucket's lock.
    async fn remove_locked(&self, bucket: &str, id: &str) -> Result<()> {
        let items = self.load_bucket(bucket).await?;
        let before = items.len();
        let remaining: Vec<QueueItem> = items.into_iter().filter(|item| item.id != id).collect();
        if remaining.len() == before {
            return Ok(());
        }
        self.write_bucket(bucket, &remaining).await?;
        Ok(())
    }

    async fn load_bucket(&self, bucket: &str) -> std::result::Result<Vec<QueueItem>, StoreError> {
        match self.store.get(&queue_storage_key(bucket)).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_bucket(
        &self,
        bucket: &str,
        items: &[QueueItem],
    ) -> std::result::Result<(), StoreError> {
        let json = serde_json::to_string(items)?;
        self.store.set(&queue_storage_key(bucket), &json).await
    }

    async fn bucket_lock(&self, bucket: &str) -> Arc<Mutex<()>> {
        let mut locks = self.bucket_locks.lock().await;
        Arc::clone(locks.entry(bucket.to_string()).or_default())
    }
}
