//! Integration tests for thermopad-api
//!
//! Uses wiremock to simulate the device-control API and verifies
//! end-to-end behavior of the request executor: pacing, classification,
//! backoff, fail-soft exhaustion, and the typed device operations.

mod common;

mod test_devices;
mod test_retry;
