#![allow(clippy::unwrap_used)]
// Device-activation flow tests using wiremock.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{DEVICE_CODE_GRANT, mount_me_and_home, test_endpoints};
use tadofly_api::{ActivationStatus, Connection, ConnectionConfig, Error};

fn device_flow_config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig {
        endpoints: test_endpoints(server),
        ..ConnectionConfig::default()
    }
}

async fn mount_device_authorize(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/device_authorize"))
        .and(query_param("client_id", tadofly_api::CLIENT_ID_DEVICE))
        .and(query_param("scope", "offline_access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dc-1",
            "user_code": "1BCDE",
            "verification_uri": "https://login.example.com/device",
            "expires_in": 300,
            "interval": 0,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn activation_completes_on_the_third_poll() {
    let server = MockServer::start().await;
    mount_device_authorize(&server).await;

    // Two authorization_pending answers, then tokens. Mount order
    // matters: wiremock evaluates mocks in insertion order.
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("grant_type", DEVICE_CODE_GRANT))
        .and(query_param("device_code", "dc-1"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "authorization_pending" })),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("grant_type", DEVICE_CODE_GRANT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 600,
            "refresh_token": "rt-from-device-flow",
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_me_and_home(&server, json!({ "id": 1234 })).await;

    let mut conn = Connection::new(device_flow_config(&server)).unwrap();
    conn.begin_device_flow().await.unwrap();

    assert_eq!(conn.activation_status(), ActivationStatus::Pending);
    assert_eq!(conn.user_code(), Some("1BCDE"));
    assert_eq!(
        conn.verification_url(),
        Some("https://login.example.com/device?user_code=1BCDE")
    );

    conn.activate().await.unwrap();

    assert_eq!(conn.activation_status(), ActivationStatus::Completed);
    assert_eq!(conn.home_id(), Some(1234));
    assert_eq!(conn.is_line_x(), Some(false));
    assert_eq!(conn.refresh_token().as_deref(), Some("rt-from-device-flow"));
    // Ephemeral flow state is cleared once activation completes.
    assert_eq!(conn.user_code(), None);
    assert_eq!(conn.verification_url(), None);
}

#[tokio::test]
async fn begin_fails_on_authorization_endpoint_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/device_authorize"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let mut conn = Connection::new(device_flow_config(&server)).unwrap();
    let err = conn.begin_device_flow().await.unwrap_err();

    assert!(matches!(err, Error::Activation { .. }), "got: {err:?}");
    assert_eq!(conn.activation_status(), ActivationStatus::NotStarted);
}

#[tokio::test]
async fn begin_twice_is_an_error() {
    let server = MockServer::start().await;
    mount_device_authorize(&server).await;

    let mut conn = Connection::new(device_flow_config(&server)).unwrap();
    conn.begin_device_flow().await.unwrap();

    let err = conn.begin_device_flow().await.unwrap_err();
    assert!(matches!(err, Error::Activation { .. }), "got: {err:?}");
}

#[tokio::test]
async fn poll_fails_fatally_on_unexpected_token_error() {
    let server = MockServer::start().await;
    mount_device_authorize(&server).await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "access_denied" })))
        .mount(&server)
        .await;

    let mut conn = Connection::new(device_flow_config(&server)).unwrap();
    conn.begin_device_flow().await.unwrap();

    let err = conn.activate().await.unwrap_err();
    assert!(matches!(err, Error::Activation { .. }), "got: {err:?}");
}

#[tokio::test]
async fn expired_code_fails_before_polling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/device_authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dc-1",
            "user_code": "1BCDE",
            "verification_uri": "https://login.example.com/device",
            "expires_in": 0,
            "interval": 0,
        })))
        .mount(&server)
        .await;

    // The token endpoint must never be called for an expired code.
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut conn = Connection::new(device_flow_config(&server)).unwrap();
    conn.begin_device_flow().await.unwrap();

    // expires_in 0 puts the deadline in the past by poll time.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let err = conn.activate().await.unwrap_err();
    assert!(matches!(err, Error::Activation { .. }), "got: {err:?}");
    assert_eq!(conn.activation_status(), ActivationStatus::Pending);
}

#[tokio::test]
async fn line_x_home_is_detected() {
    let server = MockServer::start().await;
    let conn =
        common::activated_connection_with_home(&server, json!({ "id": 1234, "generation": "LINE_X" }))
            .await;
    assert_eq!(conn.is_line_x(), Some(true));
}

#[tokio::test]
async fn other_generation_values_are_not_line_x() {
    let server = MockServer::start().await;
    let conn = common::activated_connection_with_home(
        &server,
        json!({ "id": 1234, "generation": "LINE_X2" }),
    )
    .await;
    assert_eq!(conn.is_line_x(), Some(false));
}
