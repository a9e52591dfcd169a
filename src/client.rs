//! HTTP client for the Runway API.
//!
//! This module centralizes authentication headers, base URLs, and transport
//! retry behavior for every vendor call made by the tool adapters.

use anyhow::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, RetryPolicy};
use crate::logging;

// === Types ===

/// Errors surfaced from the Runway API boundary.
///
/// Variants are ordered by classification precedence: a failed task wins
/// over not-found, which wins over not-cancelable, which wins over the
/// generic API/transport cases.
#[derive(Debug, Error)]
pub enum RunwayError {
    /// The task reached a terminal non-succeeded status.
    #[error("task {task_id} ended in status {status}")]
    TaskFailed {
        task_id: String,
        status: String,
        details: Value,
    },

    /// The requested task id does not exist.
    #[error("task {task_id} not found")]
    NotFound { task_id: String },

    /// The task is already in a terminal state and cannot be canceled.
    #[error("task {task_id} cannot be canceled")]
    NotCancelable { task_id: String },

    /// Any other non-success response from the vendor.
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The vendor returned a payload this client could not interpret.
    #[error("unexpected Runway response: {0}")]
    Unexpected(String),

    /// Network-level failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Client for Runway API requests.
#[derive(Clone, Debug)]
#[must_use]
pub struct RunwayClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

// === RunwayClient ===

impl RunwayClient {
    /// Create a Runway client from the given config.
    ///
    /// The credential must already be present; its absence is a
    /// validation-time failure at the tool layer, not here.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.runway_base_url();
        let api_secret = config.api_secret.clone().unwrap_or_default();
        let retry = config.retry_policy();

        logging::info(format!("Runway base URL: {base_url}"));
        logging::info(format!(
            "Retry policy: enabled={}, max_retries={}, initial_delay={}s, max_delay={}s",
            retry.enabled, retry.max_retries, retry.initial_delay, retry.max_delay
        ));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_secret}"))?,
        );
        headers.insert(
            "X-Runway-Version",
            HeaderValue::from_str(&config.runway_api_version())?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            retry,
        })
    }

    /// POST a JSON body to an API path and parse the JSON response.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, RunwayError> {
        let url = format!("{}{}", self.base_url, path);
        self.request(|| self.http_client.post(&url).json(body)).await
    }

    /// GET an API path and parse the JSON response.
    pub async fn get_json(&self, path: &str) -> Result<Value, RunwayError> {
        let url = format!("{}{}", self.base_url, path);
        self.request(|| self.http_client.get(&url)).await
    }

    /// DELETE an API path and parse the (possibly empty) JSON response.
    pub async fn delete_json(&self, path: &str) -> Result<Value, RunwayError> {
        let url = format!("{}{}", self.base_url, path);
        self.request(|| self.http_client.delete(&url)).await
    }

    async fn request<F>(&self, mut build: F) -> Result<Value, RunwayError>
    where
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let policy = &self.retry;
        let mut attempt: u32 = 0;

        loop {
            let result = build().send().await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return parse_body(response).await;
                    }

                    let retryable = status.as_u16() == 429 || status.is_server_error();
                    if !policy.enabled || !retryable || attempt >= policy.max_retries {
                        let text = response.text().await.unwrap_or_default();
                        return Err(RunwayError::Api {
                            status: status.as_u16(),
                            message: error_message(status.as_u16(), &text),
                        });
                    }
                    logging::warn(format!(
                        "Retryable HTTP {} (attempt {} of {})",
                        status.as_u16(),
                        attempt + 1,
                        policy.max_retries + 1
                    ));
                }
                Err(err) => {
                    if !policy.enabled || attempt >= policy.max_retries {
                        return Err(err.into());
                    }
                    logging::warn(format!(
                        "Request error: {} (attempt {} of {})",
                        err,
                        attempt + 1,
                        policy.max_retries + 1
                    ));
                }
            }

            let delay = policy.delay_for_attempt(attempt);
            attempt += 1;
            logging::info(format!("Retrying after {:.2}s", delay.as_secs_f64()));
            tokio::time::sleep(delay).await;
        }
    }
}

// === Response Helpers ===

async fn parse_body(response: reqwest::Response) -> Result<Value, RunwayError> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|e| RunwayError::Unexpected(format!("malformed response body: {e}")))
}

/// Extract a human-readable error message from a non-success response body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP status {status}")
    } else {
        trimmed.to_string()
    }
}

// === Unit Tests ===
