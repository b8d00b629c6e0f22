//! Client for the Satchel cloud sync API.
//!
//! The offline queue drains buckets one item at a time and needs per-item
//! acknowledgment, so there is deliberately no batch endpoint here: one
//! `POST /api/<bucket>/sync` per queued payload.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use satchel_core::sync::{DeliveryError, SyncDelivery};

use crate::error::{ConnectError, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Environment variable naming the cloud API base URL.
const API_URL_ENV: &str = "SATCHEL_API_URL";

/// Structured error envelope returned by the cloud API.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    code: String,
    message: String,
}

/// Client for the Satchel cloud sync API.
#[derive(Debug, Clone)]
pub struct SyncApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl SyncApiClient {
    /// Create a client against `base_url` (e.g. "https://api.satchel.school").
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Create a client from the `SATCHEL_API_URL` environment variable.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ConnectError::invalid_request(format!(
                    "{} not configured. Cloud sync operations are disabled.",
                    API_URL_ENV
                ))
            })?;
        Ok(Self::new(&base_url))
    }

    /// Attach a bearer token sent on every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn sync_url(&self, bucket: &str) -> String {
        format!("{}/api/{}/sync", self.base_url, bucket)
    }

    /// Create headers for an API request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.access_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ConnectError::invalid_request("Invalid access token format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    /// Push one queued payload to `bucket`'s sync endpoint.
    ///
    /// A 2xx response is the only success. Error responses are surfaced with
    /// the API's `{code, message}` envelope when the body carries one.
    pub async fn push_item(&self, bucket: &str, payload: &serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.sync_url(bucket))
            .headers(self.headers()?)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if status.is_success() {
            return Ok(());
        }

        if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
            return Err(ConnectError::api(
                status.as_u16(),
                format!("{}: {}", error.code, error.message),
            ));
        }
        Err(ConnectError::api(
            status.as_u16(),
            format!("Request failed: {}", body),
        ))
    }
}

#[async_trait]
impl SyncDelivery for SyncApiClient {
    async fn deliver(
        &self,
        bucket: &str,
        payload: &serde_json::Value,
    ) -> std::result::Result<(), DeliveryError> {
        self.push_item(bucket, payload)
            .await
            .map_err(|err| match err.status_code() {
                Some(status) => DeliveryError::http_status(status, err.to_string()),
                None => DeliveryError::transport(err.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_url_targets_the_bucket_endpoint() {
        let client = SyncApiClient::new("https://api.satchel.school/");
        assert_eq!(
            client.sync_url("lessons"),
            "https://api.satchel.school/api/lessons/sync"
        );
    }

    #[test]
    fn headers_carry_bearer_token_when_set() {
        let client = SyncApiClient::new("https://api.satchel.school").with_access_token("t0ken");
        let headers = client.headers().expect("headers");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t0ken");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn malformed_token_is_rejected_before_sending() {
        let client = SyncApiClient::new("https://api.satchel.school").with_access_token("bad\ntoken");
        assert!(matches!(
            client.headers(),
            Err(ConnectError::InvalidRequest(_))
        ));
    }

    #[test]
    fn base_url_resolution_from_env() {
        // Single test for both phases: env vars are process-global and the
        // test harness runs tests concurrently.
        std::env::remove_var(API_URL_ENV);
        assert!(matches!(
            SyncApiClient::from_env(),
            Err(ConnectError::InvalidRequest(_))
        ));

        std::env::set_var(API_URL_ENV, "  https://api.satchel.school/  ");
        let client = SyncApiClient::from_env().expect("client from env");
        assert_eq!(
            client.sync_url("messages"),
            "https://api.satchel.school/api/messages/sync"
        );
        std::env::remove_var(API_URL_ENV);
    }
}
