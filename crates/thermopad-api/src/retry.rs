//! Error classification and backoff policy
//!
//! Failures are classified into an [`ApiError`] variant by pure functions
//! over the status code or transport error, and the retry decision is a
//! table lookup keyed by variant:
//!
//! - HTTP 403, connection failures, unexpected statuses, and unparseable
//!   bodies are configuration/connectivity problems: fatal, never retried.
//! - HTTP 429 is retried with a long doubling backoff (base 30s).
//! - HTTP 5xx and timeouts are retried with a short doubling backoff
//!   (base 10s).
//!
//! The doubling rule is `delay = base * 2^consumed`, where `consumed` is
//! the number of retries already spent on this logical call, giving
//! 30s/60s/120s and 10s/20s/40s sequences at the default bases.

use std::time::Duration;

use reqwest::StatusCode;

use crate::ApiError;

/// Default backoff base after an HTTP 429
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(30);

/// Default backoff base after a 5xx or timeout
pub const SERVER_ERROR_BACKOFF: Duration = Duration::from_secs(10);

/// Default attempt budget per logical call
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// What to do about a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Raise to the caller immediately; retrying cannot help
    Fatal,
    /// Retry after a backoff derived from `base`
    Retry {
        /// Base delay for this failure class, doubled per retry consumed
        base: Duration,
    },
}

/// Retry budget and backoff bases for one client
///
/// The bases default to the values above; tests shrink them to
/// milliseconds so retry paths run fast against a mock server.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Default number of attempts per logical call
    pub max_attempts: usize,
    /// Backoff base for [`ApiError::RateLimited`]
    pub rate_limit_backoff: Duration,
    /// Backoff base for [`ApiError::ServerError`] and [`ApiError::Timeout`]
    pub server_error_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
            server_error_backoff: SERVER_ERROR_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Looks up the disposition for a classified failure
    #[must_use]
    pub fn disposition(&self, error: &ApiError) -> Disposition {
        match error {
            ApiError::RateLimited => Disposition::Retry {
                base: self.rate_limit_backoff,
            },
            ApiError::ServerError { .. } | ApiError::Timeout => Disposition::Retry {
                base: self.server_error_backoff,
            },
            ApiError::AuthInvalid
            | ApiError::CannotConnect(_)
            | ApiError::Http { .. }
            | ApiError::InvalidResponse(_)
            | ApiError::Cancelled => Disposition::Fatal,
        }
    }
}

/// Computes the backoff delay for the given number of retries already consumed
#[must_use]
pub fn backoff_delay(base: Duration, consumed: u32) -> Duration {
    base.saturating_mul(1u32 << consumed.min(31))
}

/// Classifies an HTTP error status into an [`ApiError`] variant
///
/// Must only be called for non-success statuses.
#[must_use]
pub fn classify_status(status: StatusCode) -> ApiError {
    match status {
        StatusCode::FORBIDDEN => ApiError::AuthInvalid,
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => ApiError::ServerError {
            status: status.as_u16(),
        },
        other => ApiError::Http {
            status: other.as_u16(),
        },
    }
}

/// Classifies a transport-level failure into an [`ApiError`] variant
#[must_use]
pub fn classify_transport(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::CannotConnect(error.to_string())
    }
}
