//! Remote delivery contract and retry classification helpers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote acknowledgment sink for queued payloads.
///
/// `Ok(())` means the bucket's endpoint acknowledged the payload (an HTTP
/// 2xx-equivalent). Everything else, non-2xx status and transport failures
/// included, is an `Err` and leaves the item queued.
#[async_trait]
pub trait SyncDelivery: Send + Sync {
    async fn deliver(
        &self,
        bucket: &str,
        payload: &serde_json::Value,
    ) -> Result<(), DeliveryError>;
}

/// A failed delivery attempt, as reported back to the queue manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Delivery failed: {message}")]
pub struct DeliveryError {
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl DeliveryError {
    /// Failure with an HTTP status (the server rejected the payload).
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure before any status arrived (connect error, timeout).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Classify this failure for retry policy.
    pub fn retry_class(&self) -> SyncRetryClass {
        match self.status {
            Some(status) => classify_http_status(status),
            // No response at all: the network came and went, try again later.
            None => SyncRetryClass::Retryable,
        }
    }
}

/// Retry policy classification for delivery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRetryClass {
    Retryable,
    Permanent,
    ReauthRequired,
}

/// Classify an HTTP status into retry behavior.
pub fn classify_http_status(status: u16) -> SyncRetryClass {
    match status {
        401 | 403 => SyncRetryClass::ReauthRequired,
        408 | 409 | 423 | 425 | 429 => SyncRetryClass::Retryable,
        500..=599 => SyncRetryClass::Retryable,
        _ => SyncRetryClass::Permanent,
    }
}

/// Exponential backoff in seconds with cap.
///
/// The queue never self-schedules; hosts use this to decide when to invoke
/// the next sync pass after a failed one.
pub fn backoff_seconds(consecutive_failures: i32) -> i64 {
    const MAX_EXPONENT: i32 = 8;
    const BASE_DELAY_SECONDS: i64 = 5;

    let capped = consecutive_failures.clamp(0, MAX_EXPONENT) as u32;
    2_i64.pow(capped) * BASE_DELAY_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_http_status_for_retry_policy() {
        assert_eq!(classify_http_status(503), SyncRetryClass::Retryable);
        assert_eq!(classify_http_status(429), SyncRetryClass::Retryable);
        assert_eq!(classify_http_status(403), SyncRetryClass::ReauthRequired);
        assert_eq!(classify_http_status(404), SyncRetryClass::Permanent);
    }

    #[test]
    fn transport_failures_are_retryable() {
        let err = DeliveryError::transport("connection reset");
        assert_eq!(err.retry_class(), SyncRetryClass::Retryable);
        assert_eq!(err.status, None);
    }

    #[test]
    fn server_rejection_carries_status() {
        let err = DeliveryError::http_status(422, "invalid lesson plan");
        assert_eq!(err.retry_class(), SyncRetryClass::Permanent);
        assert_eq!(err.status, Some(422));
    }

    #[test]
    fn backoff_is_exponential_and_capped() {
        assert_eq!(backoff_seconds(0), 5);
        assert_eq!(backoff_seconds(1), 10);
        assert_eq!(backoff_seconds(3), 40);
        assert_eq!(backoff_seconds(20), backoff_seconds(8));
    }
}
