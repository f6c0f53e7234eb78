//! Resilient request executor
//!
//! [`ApiClient`] performs one logical API call per [`execute`](ApiClient::execute):
//! it waits at the [`AdmissionGate`](crate::gate::AdmissionGate), issues the
//! transport call with the bearer token, and on failure classifies the
//! error and either raises, retries after backoff, or fails soft.
//!
//! Fail-soft: when the retry budget is exhausted on a retryable failure
//! (429, 5xx, timeout), the call returns an **empty JSON object** instead
//! of an error, so callers such as the refresh coordinator can keep
//! serving previously cached state. Hard failures (invalid token,
//! connection failures, unexpected statuses) are raised immediately.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thermopad_core::config::Config;

use crate::gate::AdmissionGate;
use crate::retry::{backoff_delay, classify_status, classify_transport, Disposition, RetryPolicy};
use crate::ApiError;

/// Immutable description of one logical API call
///
/// Reused unchanged across every retry attempt; the executor never
/// mutates it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    extra_headers: HeaderMap,
    max_attempts: Option<usize>,
}

impl ApiRequest {
    /// Describes a call to `path` (relative to the client's base URL)
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            extra_headers: HeaderMap::new(),
            max_attempts: None,
        }
    }

    /// Adds a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON request body
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds an extra header; the bearer token is always written after
    /// these, so an `Authorization` header supplied here never wins
    #[must_use]
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// Overrides the client's default attempt budget for this call
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// The request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// HTTP client for the device-control API
///
/// Owns one persistent `reqwest::Client` (connection pool) and one
/// [`AdmissionGate`] for its lifetime. All requests made through the same
/// `ApiClient` share the gate's sliding-window quota.
pub struct ApiClient {
    /// The underlying HTTP client
    http: Client,
    /// Base URL for API requests, without trailing slash
    base_url: String,
    /// Pre-built `Authorization: Bearer ...` header value
    auth_header: HeaderValue,
    /// Sliding-window admission gate
    gate: AdmissionGate,
    /// Classification-to-backoff policy and default budget
    policy: RetryPolicy,
    /// Cancels in-flight gate waits and backoff sleeps
    cancel: CancellationToken,
}

impl ApiClient {
    /// Creates a client with default pacing and retry settings
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g. `https://api.developer.sleep.me/v1`)
    /// * `token` - Bearer token for API authentication
    pub fn new(base_url: impl Into<String>, token: &str) -> anyhow::Result<Self> {
        Self::with_settings(
            base_url,
            token,
            Duration::from_secs(10),
            AdmissionGate::new(9, Duration::from_secs(60)),
            RetryPolicy::default(),
        )
    }

    /// Creates a client from the application configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let token = config
            .api
            .token
            .as_deref()
            .context("No API token configured; run 'thermopad setup' first")?;

        Self::with_settings(
            config.api.base_url.clone(),
            token,
            Duration::from_secs(config.api.request_timeout_secs),
            AdmissionGate::new(
                config.rate_limit.max_requests_per_window,
                Duration::from_secs(config.rate_limit.window_secs),
            ),
            RetryPolicy {
                max_attempts: config.rate_limit.max_attempts,
                rate_limit_backoff: Duration::from_secs(config.rate_limit.rate_limit_backoff_secs),
                server_error_backoff: Duration::from_secs(
                    config.rate_limit.server_error_backoff_secs,
                ),
            },
        )
    }

    /// Creates a client with explicit pacing and retry settings
    pub fn with_settings(
        base_url: impl Into<String>,
        token: &str,
        request_timeout: Duration,
        gate: AdmissionGate,
        policy: RetryPolicy,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let mut auth_header = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("API token contains characters not valid in a header")?;
        auth_header.set_sensitive(true);

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http,
            base_url,
            auth_header,
            gate,
            policy,
            cancel: CancellationToken::new(),
        })
    }

    /// Returns a token that cancels this client's gate waits and backoff
    /// sleeps; cancelled calls fail with [`ApiError::Cancelled`]
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the admission gate shared by this client's requests
    #[must_use]
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Returns the base URL for API requests
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Executes one logical API call with pacing, classification, and retry
    ///
    /// Protocol per attempt:
    /// 1. Wait at the admission gate.
    /// 2. Send the request with the bearer token written after any
    ///    caller-supplied headers.
    /// 3. On a non-error status, parse the body as JSON and return it
    ///    (an empty body parses as an empty object).
    /// 4. On failure, classify: fatal errors are returned immediately;
    ///    retryable errors consume one attempt and back off with the
    ///    doubling rule, and once the budget is spent the call degrades to
    ///    an empty JSON object.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let max_attempts = request.max_attempts.unwrap_or(self.policy.max_attempts).max(1);
        let mut attempts_remaining = max_attempts;

        loop {
            self.gated_admit().await?;

            let error = match self.attempt(request).await {
                Ok(value) => {
                    debug!(method = %request.method, path = %request.path, "API request successful");
                    return Ok(value);
                }
                Err(error) => error,
            };

            match self.policy.disposition(&error) {
                Disposition::Fatal => {
                    debug!(method = %request.method, path = %request.path, %error, "Non-retryable failure");
                    return Err(error);
                }
                Disposition::Retry { base } => {
                    // Retries consumed so far decide the doubling exponent.
                    let consumed = (max_attempts - attempts_remaining) as u32;
                    attempts_remaining -= 1;

                    if attempts_remaining == 0 {
                        info!(
                            method = %request.method,
                            path = %request.path,
                            %error,
                            "Retry budget exhausted, returning empty payload"
                        );
                        return Ok(empty_object());
                    }

                    let delay = backoff_delay(base, consumed);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        %error,
                        delay_secs = delay.as_secs_f64(),
                        attempts_left = attempts_remaining,
                        "Transient failure, backing off before retry"
                    );
                    self.gated_sleep(delay).await?;
                }
            }
        }
    }

    /// Lists all devices claimed by the configured token (`GET devices`)
    ///
    /// Device-independent, so it lives on the client rather than on
    /// [`DeviceClient`](crate::device::DeviceClient). Uses a single
    /// attempt; a transient failure degrades to an empty list.
    pub async fn list_claimed_devices(
        &self,
    ) -> Result<Vec<thermopad_core::domain::ClaimedDevice>, ApiError> {
        let request = ApiRequest::new(Method::GET, "devices").max_attempts(1);
        let value = self.execute(&request).await?;

        match value {
            Value::Array(_) => serde_json::from_value(value)
                .map_err(|e| ApiError::InvalidResponse(e.to_string())),
            Value::Object(map) if map.is_empty() => {
                warn!("Claimed device listing unavailable, returning empty list");
                Ok(Vec::new())
            }
            other => Err(ApiError::InvalidResponse(format!(
                "expected a device array, got {other}"
            ))),
        }
    }

    /// Releases the client, closing the underlying connection pool
    ///
    /// Consumes `self`, so shutdown can only happen once and the client
    /// cannot be used afterwards. Clients shared behind an `Arc` (as the
    /// CLI builds them) are released when the last handle drops instead;
    /// dropping also cancels any gated or backing-off calls.
    pub async fn shutdown(self) {
        debug!("Shutting down API client");
        self.cancel.cancel();
        debug!("API client closed");
    }

    /// Performs one physical attempt: build, send, classify, parse
    async fn attempt(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );

        let mut headers = request.extra_headers.clone();
        // Written after merging caller headers so it is never overridden.
        headers.insert(AUTHORIZATION, self.auth_header.clone());

        let mut builder = self.http.request(request.method.clone(), &url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, %url, "Sending API request");
        let response = builder.send().await.map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let bytes = response.bytes().await.map_err(|e| classify_transport(&e))?;
        if bytes.is_empty() {
            return Ok(empty_object());
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Waits at the admission gate, racing the cancellation token
    async fn gated_admit(&self) -> Result<(), ApiError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            _ = self.gate.admit() => Ok(()),
        }
    }

    /// Backoff sleep, racing the cancellation token
    async fn gated_sleep(&self, delay: Duration) -> Result<(), ApiError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            _ = sleep(delay) => Ok(()),
        }
    }
}

impl Drop for ApiClient {
    fn drop(&mut self) {
        // Dropping the last handle aborts calls still waiting at the gate
        // or in a backoff sleep, matching the explicit shutdown path.
        self.cancel.cancel();
    }
}

/// The fail-soft payload: an empty JSON object
fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
