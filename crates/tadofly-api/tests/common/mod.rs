// Shared wiremock scaffolding for the integration tests.
//
// Every endpoint base (resource APIs and the OAuth2 authority) is
// pointed at one MockServer; paths then distinguish the surfaces:
// `/oauth2/*` for auth, `/api/v2/*` for my.tado.com, `/hops/*` for
// hops.tado.com.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tadofly_api::{Connection, ConnectionConfig, EndpointUrls};

pub const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// An endpoint set with every base pointing at the mock server.
pub fn test_endpoints(server: &MockServer) -> EndpointUrls {
    let uri = server.uri();
    EndpointUrls {
        my_api: format!("{uri}/api/v2/"),
        hops_api: format!("{uri}/hops/"),
        mobile: format!("{uri}/mobile/1.9/"),
        eiq: format!("{uri}/eiq/"),
        tariff: format!("{uri}/tariff/"),
        genie: format!("{uri}/genie/"),
        minder: format!("{uri}/minder/"),
        auth: format!("{uri}/oauth2/"),
    }
}

/// A config that will bootstrap from a saved refresh token against the
/// mock server, skipping the device flow.
pub fn seeded_config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig {
        saved_refresh_token: Some("seed-token".into()),
        endpoints: test_endpoints(server),
        ..ConnectionConfig::default()
    }
}

/// Mount a token endpoint that answers every refresh-token grant.
pub async fn mount_refresh_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 600,
            "refresh_token": "rt-next",
        })))
        .mount(server)
        .await;
}

/// Mount the post-activation follow-up endpoints: `me` and the home's
/// root metadata document.
pub async fn mount_me_and_home(server: &MockServer, home: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v2/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "homes": [{ "id": 1234, "name": "Test Home" }],
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/homes/1234/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(home))
        .mount(server)
        .await;
}

/// A fully activated connection against the mock server, bootstrapped
/// through the saved-token path for a pre-LINE_X home.
pub async fn activated_connection(server: &MockServer) -> Connection {
    activated_connection_with_home(server, json!({ "id": 1234, "name": "Test Home" })).await
}

/// Same, with a caller-supplied home metadata document (for LINE_X).
pub async fn activated_connection_with_home(
    server: &MockServer,
    home: serde_json::Value,
) -> Connection {
    mount_refresh_success(server).await;
    mount_me_and_home(server, home).await;

    let mut conn = Connection::new(seeded_config(server)).expect("client should build");
    conn.connect().await.expect("bootstrap should succeed");
    conn
}
