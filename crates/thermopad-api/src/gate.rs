//! Sliding-window admission gate
//!
//! Paces outbound requests so that at most `quota` of them are admitted in
//! any sliding `window` span. Admission never fails; a caller arriving at
//! a full window is suspended until the oldest tracked admission ages out.
//!
//! The tracked timestamps live in a fixed-capacity deque: insertion always
//! succeeds and the oldest entry silently drops off once capacity is
//! reached. The whole check-wait-record sequence runs under one async
//! mutex, so concurrent callers of the same gate cannot both observe spare
//! capacity and overshoot the quota.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Sliding-window rate limiter controlling request pacing
///
/// Created once per client instance and shared by every attempt (including
/// retries) that client makes. Uses `tokio::time::Instant` so tests can
/// drive it with a paused clock.
#[derive(Debug)]
pub struct AdmissionGate {
    /// Maximum admissions within one window; immutable after construction
    quota: usize,
    /// Length of the sliding window
    window: Duration,
    /// Instants of the most recent up-to-`quota` admissions, oldest first
    admitted: Mutex<VecDeque<Instant>>,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `quota` requests per `window`
    ///
    /// A zero quota would deadlock every caller, so it is clamped to 1.
    pub fn new(quota: usize, window: Duration) -> Self {
        Self {
            quota: quota.max(1),
            window,
            admitted: Mutex::new(VecDeque::with_capacity(quota.max(1))),
        }
    }

    /// Admits one request, suspending the caller if the window is full
    ///
    /// If `quota` admissions are already tracked and the oldest is less
    /// than `window` old, sleeps for the remainder of its age before
    /// proceeding. Unconditionally records the post-wait current time,
    /// evicting the oldest entry at capacity.
    ///
    /// The mutex is held across the wait, which serializes the
    /// check-wait-record sequence; a single wait computation is therefore
    /// sufficient per admission.
    pub async fn admit(&self) {
        let mut admitted = self.admitted.lock().await;

        if admitted.len() == self.quota {
            if let Some(&oldest) = admitted.front() {
                let age = Instant::now().duration_since(oldest);
                if age < self.window {
                    let wait = self.window - age;
                    debug!(
                        wait_ms = wait.as_millis() as u64,
                        quota = self.quota,
                        "Window full, delaying admission"
                    );
                    sleep(wait).await;
                }
            }
            admitted.pop_front();
        }

        admitted.push_back(Instant::now());
    }

    /// Number of admissions currently tracked (at most `quota`)
    pub async fn tracked(&self) -> usize {
        self.admitted.lock().await.len()
    }

    /// The configured quota
    #[must_use]
    pub fn quota(&self) -> usize {
        self.quota
    }

    /// The configured window length
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}
