//! Integration tests for the typed device operations

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thermopad_api::ApiError;
use thermopad_core::domain::{Celsius, PowerState};

use crate::common;

#[tokio::test]
async fn test_device_status_parses_typed_document() {
    let server = MockServer::start().await;
    common::mount_device_status(&server).await;

    let client = common::device_client(&server);
    let status = client.device_status().await.unwrap();

    assert_eq!(status.status.water_level, Some(87.0));
    assert_eq!(status.status.is_connected, Some(true));
    assert_eq!(status.control.set_temperature_c, Some(20.0));
    assert_eq!(
        status.control.thermal_control_status,
        Some(PowerState::Active)
    );
    assert_eq!(status.about.model.as_deref(), Some("DP999NA"));
    assert!(!status.is_empty());
}

#[tokio::test]
async fn test_device_status_fails_soft_to_empty_document() {
    let server = MockServer::start().await;
    // Reads use a budget of one, so a single 500 exhausts it.
    common::mount_device_status_code(&server, 500).await;

    let client = common::device_client(&server);
    let status = client.device_status().await.unwrap();

    assert!(status.is_empty());
}

#[tokio::test]
async fn test_set_temperature_sends_setpoint_and_parses_echo() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/devices/{}", common::TEST_DEVICE)))
        .and(body_json(json!({"set_temperature_c": 21.5})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"set_temperature_c": 21.5})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::device_client(&server);
    // 21.3 rounds to the nearest half degree before hitting the wire.
    let echo = client.set_temperature(Celsius::new(21.3).unwrap()).await.unwrap();

    assert_eq!(echo.set_temperature_c, Some(21.5));
}

#[tokio::test]
async fn test_set_power_mismatched_echo_still_returned() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/devices/{}", common::TEST_DEVICE)))
        .and(body_json(json!({"thermal_control_status": "active"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"thermal_control_status": "standby"})),
        )
        .mount(&server)
        .await;

    let client = common::device_client(&server);
    // The mismatch is logged, not raised; the caller sees the echo.
    let echo = client.set_power(PowerState::Active).await.unwrap();
    assert_eq!(echo.thermal_control_status, Some(PowerState::Standby));
}

#[tokio::test]
async fn test_set_power_empty_echo_yields_default_control_state() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/devices/{}", common::TEST_DEVICE)))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let client = common::device_client(&server);
    let echo = client.set_power(PowerState::Standby).await.unwrap();

    assert_eq!(echo.thermal_control_status, None);
    assert_eq!(echo.set_temperature_c, None);
}

#[tokio::test]
async fn test_list_claimed_devices_parses_listing() {
    let server = MockServer::start().await;
    common::mount_claimed_devices(
        &server,
        json!([
            {"id": "dev-1", "name": "Bedroom", "attachments": ["CHILIPAD_PRO"]},
            {"id": "dev-2", "name": "Guest", "model": "ST501NA"}
        ]),
    )
    .await;

    let client = common::api_client(&server);
    let devices = client.list_claimed_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, "dev-1");
    assert_eq!(devices[0].attachments, vec!["CHILIPAD_PRO"]);
    assert_eq!(devices[1].model.as_deref(), Some("ST501NA"));
}

#[tokio::test]
async fn test_list_claimed_devices_invalid_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let result = client.list_claimed_devices().await;

    assert!(matches!(result, Err(ApiError::AuthInvalid)));
}

#[tokio::test]
async fn test_list_claimed_devices_fails_soft_to_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    // Listing uses a single attempt; the 429 exhausts it and the empty
    // fail-soft payload becomes an empty list.
    let devices = client.list_claimed_devices().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_list_claimed_devices_rejects_non_array_payload() {
    let server = MockServer::start().await;
    common::mount_claimed_devices(&server, json!({"unexpected": "shape"})).await;

    let client = common::api_client(&server);
    let result = client.list_claimed_devices().await;

    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
}
