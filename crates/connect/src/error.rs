//! Error types for the cloud API client.

use thiserror::Error;

use satchel_core::sync::{classify_http_status, SyncRetryClass};

/// Result type alias for cloud API operations.
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Errors that can occur while talking to the Satchel cloud API.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the cloud API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request could not be built (missing base URL, malformed token)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ConnectError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// HTTP status if the server answered with an error response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify error for retry policy.
    pub fn retry_class(&self) -> SyncRetryClass {
        match self {
            Self::Api { status, .. } => classify_http_status(*status),
            Self::Http(_) => SyncRetryClass::Retryable,
            Self::Json(_) | Self::InvalidRequest(_) => SyncRetryClass::Permanent,
        }
    }
}
