//! Thermopad API - resilient device-control API client
//!
//! Provides an async client for the device-control cloud API:
//! - Sliding-window request pacing against the strict per-minute quota
//! - Failure classification with differentiated exponential backoff
//! - Bounded retry budgets with a fail-soft empty result on exhaustion
//! - Typed device operations (status, setpoint, power, device listing)
//!
//! ## Modules
//!
//! - [`gate`] - Sliding-window admission gate for request pacing
//! - [`retry`] - Error classification and backoff policy
//! - [`client`] - The resilient request executor
//! - [`device`] - Typed per-device operations over the executor

pub mod client;
pub mod device;
pub mod gate;
pub mod retry;

pub use client::{ApiClient, ApiRequest};
pub use device::DeviceClient;

use thiserror::Error;

/// Errors that can occur when communicating with the device-control API
///
/// Each variant corresponds to one failure class with its own retry
/// disposition; see [`retry::RetryPolicy::disposition`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer token was rejected (HTTP 403); never retried
    #[error("Invalid API token (HTTP 403)")]
    AuthInvalid,

    /// Request quota exceeded (HTTP 429); retried with long backoff
    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    /// A server-side error occurred (500/502/503/504); retried with short backoff
    #[error("Server error (HTTP {status})")]
    ServerError {
        /// The status code received
        status: u16,
    },

    /// The transport timed out waiting for a response; retried with short backoff
    #[error("Request timed out")]
    Timeout,

    /// A connection-level failure (DNS, refused, reset); never retried
    #[error("Cannot connect: {0}")]
    CannotConnect(String),

    /// Any other HTTP error status; never retried
    #[error("Unexpected HTTP status {status}")]
    Http {
        /// The status code received
        status: u16,
    },

    /// A 2xx response body that could not be parsed as JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The owning task cancelled the call while it was gated or backing off
    #[error("Request cancelled")]
    Cancelled,
}
