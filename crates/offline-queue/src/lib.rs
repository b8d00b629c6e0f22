//! Durable offline queue for pending school-app mutations.
//!
//! Screens enqueue lesson plans, quizzes, and parent messages while the
//! device is offline; a sync pass drains each bucket against the cloud API
//! when connectivity returns, with per-item success/failure accounting.

mod error;
mod manager;

pub use error::{QueueError, Result};
pub use manager::OfflineQueueManager;
