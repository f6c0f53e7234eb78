//! Refresh coordinator - periodic polling with last-known-good caching
//!
//! The [`RefreshCoordinator`] sits between the device API adapter and
//! anything that wants a current view of the device (the CLI `watch`
//! command, future UI surfaces). It polls on a fixed interval and
//! publishes [`Snapshot`]s over a watch channel.
//!
//! ## Flow
//!
//! ```text
//! interval tick ──┐
//! manual refresh ─┼──→ poll device_status ──→ watch::Sender<Snapshot>
//! cancellation  ──┘         │
//!                    last-known-good cache
//! ```
//!
//! A poll that errors or comes back empty (the API client's fail-soft
//! exhaustion result) republishes the cached status marked stale instead
//! of failing, so a flaky cloud never blanks the consumer's view.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thermopad_core::domain::DeviceStatus;
use thermopad_core::ports::DeviceApi;

/// One published view of the device
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The most recent status document available
    pub status: DeviceStatus,
    /// When `status` was actually fetched from the API
    pub fetched_at: DateTime<Utc>,
    /// True when the poll that produced this snapshot failed and `status`
    /// is the retained last-known-good document
    pub stale: bool,
}

/// Handle held by consumers of a running coordinator
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    snapshot_rx: watch::Receiver<Option<Snapshot>>,
    refresh_tx: mpsc::Sender<()>,
    cancel: CancellationToken,
}

impl RefreshHandle {
    /// Returns a receiver for published snapshots
    ///
    /// The value is `None` until the first poll completes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.snapshot_rx.clone()
    }

    /// Requests an immediate poll, bypassing the interval
    ///
    /// Used after control writes so consumers see the effect quickly.
    /// A request that races an in-flight poll is coalesced.
    pub fn request_refresh(&self) {
        debug!("Immediate refresh requested");
        let _ = self.refresh_tx.try_send(());
    }

    /// Stops the coordinator's run loop
    pub fn shutdown(&self) {
        info!("Refresh coordinator shutdown requested");
        self.cancel.cancel();
    }
}

/// Polls device status and publishes snapshots
pub struct RefreshCoordinator {
    api: Arc<dyn DeviceApi>,
    poll_interval: Duration,
    snapshot_tx: watch::Sender<Option<Snapshot>>,
    refresh_rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
    /// Last successfully fetched snapshot, republished on failure
    last_good: Option<Snapshot>,
}

impl RefreshCoordinator {
    /// Creates a coordinator polling `api` every `poll_interval`
    ///
    /// Returns the coordinator (to be driven via [`run`](Self::run)) and
    /// the [`RefreshHandle`] consumers use to subscribe and shut down.
    pub fn new(api: Arc<dyn DeviceApi>, poll_interval: Duration) -> (Self, RefreshHandle) {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();

        info!(
            poll_secs = poll_interval.as_secs(),
            "Creating refresh coordinator"
        );

        let handle = RefreshHandle {
            snapshot_rx,
            refresh_tx,
            cancel: cancel.clone(),
        };

        let coordinator = Self {
            api,
            poll_interval,
            snapshot_tx,
            refresh_rx,
            cancel,
            last_good: None,
        };

        (coordinator, handle)
    }

    /// Main polling loop
    ///
    /// Polls immediately on startup (the first interval tick fires at
    /// once), then on every tick or manual refresh request, until the
    /// handle cancels it.
    pub async fn run(mut self) {
        info!("Refresh coordinator starting");

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Refresh coordinator stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                Some(()) = self.refresh_rx.recv() => {
                    debug!("Handling immediate refresh request");
                    self.poll_once().await;
                }
            }
        }
    }

    /// Fetches status once and publishes the resulting snapshot
    async fn poll_once(&mut self) {
        let snapshot = match self.api.device_status().await {
            Ok(status) if !status.is_empty() => {
                debug!("Fetched fresh device status");
                let snapshot = Snapshot {
                    status,
                    fetched_at: Utc::now(),
                    stale: false,
                };
                self.last_good = Some(snapshot.clone());
                snapshot
            }
            Ok(_) => {
                warn!("Device status unavailable, using last known good status");
                self.stale_snapshot()
            }
            Err(error) => {
                warn!(%error, "Device status poll failed, using last known good status");
                self.stale_snapshot()
            }
        };

        // Receivers may come and go; a send with no subscribers is fine.
        let _ = self.snapshot_tx.send(Some(snapshot));
    }

    /// The cached snapshot marked stale, or an empty stale snapshot when
    /// nothing was ever fetched
    fn stale_snapshot(&self) -> Snapshot {
        match &self.last_good {
            Some(snapshot) => Snapshot {
                stale: true,
                ..snapshot.clone()
            },
            None => Snapshot {
                status: DeviceStatus::default(),
                fetched_at: Utc::now(),
                stale: true,
            },
        }
    }
}
