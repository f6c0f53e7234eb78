//! Integration tests for the request executor's retry behavior
//!
//! Each test drives the executor against a wiremock server and checks the
//! number of physical attempts, the terminal outcome, and (where relevant)
//! that backoff waits actually happened. Backoff bases are milliseconds
//! (see `common::fast_policy`) so exhaustion paths complete quickly.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thermopad_api::client::ApiRequest;
use thermopad_api::retry::RetryPolicy;
use thermopad_api::ApiError;

use crate::common;

#[tokio::test]
async fn test_success_returns_parsed_body_and_records_one_admission() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "d1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let value = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await
        .unwrap();

    assert_eq!(value, json!([{"id": "d1"}]));
    assert_eq!(client.gate().tracked().await, 1);
}

#[tokio::test]
async fn test_persistent_429_fails_soft_after_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let started = Instant::now();
    let value = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await
        .unwrap();

    // Exhaustion degrades to an empty object, not an error.
    assert_eq!(value, json!({}));
    // Two backoff waits happened (base 20ms, then 40ms).
    assert!(started.elapsed() >= Duration::from_millis(60));
    // Every attempt passed through the admission gate.
    assert_eq!(client.gate().tracked().await, 3);
}

#[tokio::test]
async fn test_503_then_success_recovers_on_second_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let value = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await
        .unwrap();

    assert_eq!(value, json!([]));
    assert_eq!(client.gate().tracked().await, 2);
}

#[tokio::test]
async fn test_403_raises_immediately_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let started = Instant::now();
    let result = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await;

    assert!(matches!(result, Err(ApiError::AuthInvalid)));
    // No backoff wait occurred.
    assert!(started.elapsed() < Duration::from_millis(20));
}

#[tokio::test]
async fn test_unexpected_status_raises_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices/nope"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let result = client
        .execute(&ApiRequest::new(Method::GET, "devices/nope"))
        .await;

    assert!(matches!(result, Err(ApiError::Http { status: 404 })));
}

#[tokio::test]
async fn test_connection_failure_raises_immediately() {
    // A server that has already shut down refuses connections.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = thermopad_api::client::ApiClient::with_settings(
        uri,
        common::TEST_TOKEN,
        Duration::from_secs(1),
        thermopad_api::gate::AdmissionGate::new(1000, Duration::from_secs(60)),
        common::fast_policy(),
    )
    .unwrap();

    let result = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await;

    assert!(matches!(result, Err(ApiError::CannotConnect(_))));
    // One admission, no retries.
    assert_eq!(client.gate().tracked().await, 1);
}

#[tokio::test]
async fn test_timeout_is_retryable_and_fails_soft() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = common::api_client_with(
        &server,
        common::fast_policy(),
        Duration::from_millis(100),
    );
    let value = client
        .execute(&ApiRequest::new(Method::GET, "devices").max_attempts(1))
        .await
        .unwrap();

    // Budget of one: the timeout consumes it and the call degrades.
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_bearer_token_survives_caller_headers() {
    let server = MockServer::start().await;
    // Only matches when the configured token is presented.
    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(header("authorization", format!("Bearer {}", common::TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let request = ApiRequest::new(Method::GET, "devices").header(
        AUTHORIZATION,
        HeaderValue::from_static("Bearer attacker-token"),
    );

    // If the caller header won, the mock would not match and the request
    // would surface as an unexpected 404.
    let value = client.execute(&request).await.unwrap();
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn test_request_description_reused_unchanged_across_attempts() {
    let server = MockServer::start().await;
    let body = json!({"set_temperature_c": 21.5});

    // The matcher only accepts the original body, and must see it on all
    // three attempts.
    Mock::given(method("PATCH"))
        .and(path("/devices/d1"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let request = ApiRequest::new(Method::PATCH, "devices/d1").body(body.clone());
    let value = client.execute(&request).await.unwrap();

    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_invalid_json_body_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let result = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await;

    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_empty_success_body_parses_as_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = common::api_client(&server);
    let value = client
        .execute(&ApiRequest::new(Method::GET, "devices"))
        .await
        .unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_custom_budget_controls_attempt_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 5,
        ..common::fast_policy()
    };
    let client = common::api_client_with(&server, policy, Duration::from_secs(5));

    // Per-request override wins over the policy default.
    let value = client
        .execute(&ApiRequest::new(Method::GET, "devices").max_attempts(2))
        .await
        .unwrap();
    assert_eq!(value, json!({}));
}
