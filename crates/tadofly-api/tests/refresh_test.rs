#![allow(clippy::unwrap_used)]
// Token refresh and saved-token bootstrap tests.

mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{mount_me_and_home, mount_refresh_success, seeded_config, test_endpoints};
use tadofly_api::{ActivationStatus, ApiRequest, Connection, ConnectionConfig, Error};

#[tokio::test]
async fn saved_token_bootstrap_skips_the_device_flow() {
    let server = MockServer::start().await;
    mount_refresh_success(&server).await;
    mount_me_and_home(&server, json!({ "id": 1234 })).await;

    // The device flow must not start when a saved token works.
    Mock::given(method("POST"))
        .and(path("/oauth2/device_authorize"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut conn = Connection::new(seeded_config(&server)).unwrap();
    let status = conn.connect().await.unwrap();

    assert_eq!(status, ActivationStatus::Completed);
    assert_eq!(conn.home_id(), Some(1234));
    assert_eq!(conn.refresh_token().as_deref(), Some("rt-next"));
}

#[tokio::test]
async fn rejected_saved_token_falls_back_to_the_device_flow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/device_authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dc-1",
            "user_code": "1BCDE",
            "verification_uri": "https://login.example.com/device",
            "expires_in": 300,
            "interval": 0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut conn = Connection::new(seeded_config(&server)).unwrap();
    let status = conn.connect().await.unwrap();

    assert_eq!(status, ActivationStatus::Pending);
    assert_eq!(conn.user_code(), Some("1BCDE"));
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    let mut conn = common::activated_connection(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/homes/1234/zones"))
        .and(header("Authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest {
        command: Some("zones".into()),
        ..ApiRequest::new()
    };
    conn.request(&request).await.unwrap();
}

#[tokio::test]
async fn stale_token_triggers_refresh_and_rejection_is_fatal() {
    let server = MockServer::start().await;

    // expires_in 0 makes every issued token immediately stale, so each
    // outbound request has to refresh first. Three successes carry the
    // bootstrap through; the fourth refresh is rejected.
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 0,
            "refresh_token": "rt-next",
        })))
        .up_to_n_times(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    mount_me_and_home(&server, json!({ "id": 1234 })).await;

    let mut conn = Connection::new(seeded_config(&server)).unwrap();
    conn.connect().await.unwrap();
    assert_eq!(conn.activation_status(), ActivationStatus::Completed);

    let request = ApiRequest {
        command: Some("zones".into()),
        ..ApiRequest::new()
    };
    let err = conn.request(&request).await.unwrap_err();

    assert!(matches!(err, Error::WrongCredentials { .. }), "got: {err:?}");
}

#[tokio::test]
async fn refresh_token_round_trips_through_the_token_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("tado").join("token.json");

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("refresh_token", "seed-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 600,
            "refresh_token": "rt-persisted",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("refresh_token", "rt-persisted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "expires_in": 600,
            "refresh_token": "rt-persisted-2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_me_and_home(&server, json!({ "id": 1234 })).await;

    // First connection: saved token, persists the rotated one.
    let mut first = Connection::new(ConnectionConfig {
        token_file_path: Some(token_path.clone()),
        saved_refresh_token: Some("seed-token".into()),
        endpoints: test_endpoints(&server),
        ..ConnectionConfig::default()
    })
    .unwrap();
    first.connect().await.unwrap();
    assert_eq!(first.refresh_token().as_deref(), Some("rt-persisted"));

    // Second connection: nothing but the token file.
    let mut second = Connection::new(ConnectionConfig {
        token_file_path: Some(token_path),
        endpoints: test_endpoints(&server),
        ..ConnectionConfig::default()
    })
    .unwrap();
    let status = second.connect().await.unwrap();

    assert_eq!(status, ActivationStatus::Completed);
    assert_eq!(second.refresh_token().as_deref(), Some("rt-persisted-2"));
}
