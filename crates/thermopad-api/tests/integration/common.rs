//! Shared test helpers for device API integration tests
//!
//! Provides wiremock-based mock server setup plus client constructors with
//! millisecond backoff bases so retry paths run fast. Pacing is left
//! effectively open (large quota) unless a test asks otherwise.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thermopad_api::client::ApiClient;
use thermopad_api::device::DeviceClient;
use thermopad_api::gate::AdmissionGate;
use thermopad_api::retry::RetryPolicy;
use thermopad_core::domain::DeviceId;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_DEVICE: &str = "dev-test-001";

/// Retry policy with the default budget but millisecond backoff bases
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        rate_limit_backoff: Duration::from_millis(20),
        server_error_backoff: Duration::from_millis(10),
    }
}

/// Client pointed at the mock server, pacing effectively disabled
pub fn api_client(server: &MockServer) -> ApiClient {
    api_client_with(server, fast_policy(), Duration::from_secs(5))
}

/// Client with explicit policy and transport timeout
pub fn api_client_with(
    server: &MockServer,
    policy: RetryPolicy,
    request_timeout: Duration,
) -> ApiClient {
    ApiClient::with_settings(
        server.uri(),
        TEST_TOKEN,
        request_timeout,
        AdmissionGate::new(1000, Duration::from_secs(60)),
        policy,
    )
    .expect("failed to build test client")
}

/// Device client bound to [`TEST_DEVICE`]
pub fn device_client(server: &MockServer) -> DeviceClient {
    DeviceClient::new(
        Arc::new(api_client(server)),
        DeviceId::new(TEST_DEVICE).unwrap(),
    )
}

/// A realistic status document for [`TEST_DEVICE`]
pub fn status_body() -> serde_json::Value {
    serde_json::json!({
        "status": {
            "water_level": 87.0,
            "is_water_low": false,
            "is_connected": true,
            "water_temperature_c": 21.5
        },
        "control": {
            "set_temperature_c": 20.0,
            "thermal_control_status": "active",
            "display_temperature_unit": "c",
            "brightness_level": 80
        },
        "about": {
            "model": "DP999NA",
            "firmware_version": "5.38.2041",
            "mac_address": "aa:bb:cc:dd:ee:ff",
            "serial_number": "1234"
        }
    })
}

/// Mounts `GET devices/{TEST_DEVICE}` returning [`status_body`]
pub async fn mount_device_status(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/devices/{TEST_DEVICE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(server)
        .await;
}

/// Mounts `GET devices/{TEST_DEVICE}` returning the given status for
/// every request
#[allow(dead_code)]
pub async fn mount_device_status_code(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/devices/{TEST_DEVICE}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts `GET devices` returning the given claimed-device listing
pub async fn mount_claimed_devices(server: &MockServer, devices: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(devices))
        .mount(server)
        .await;
}
