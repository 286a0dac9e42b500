// Authenticated connection to the Tado cloud.
//
// Owns the credentials and the HTTP transport as one struct: the
// device-activation state machine, the token-refresh scheduler, the
// retrying dispatcher, and the one-time generation detection all mutate
// it through `&mut self`, so refresh is strictly sequenced ahead of each
// dispatch and no lock is needed. The domain clients (`my`, `hops`) are
// thin wrappers over `request`/`request_as`.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::activation::{ActivationStatus, DeviceAuthorization, DeviceFlow};
use crate::error::Error;
use crate::request::{self, ApiRequest, Domain, EndpointUrls, MIME_TYPE_HEADER, MIME_TYPE_JSON};
use crate::token::{self, TokenResponse, TokenStore};
use crate::transport::TransportConfig;

/// OAuth2 client id of the device-authorization app registration.
pub const CLIENT_ID_DEVICE: &str = "1bb50063-6b0c-4d11-bd99-387f4a91cc46";

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Retry budget for transient connection failures during dispatch.
/// Fixed, immediate retry, no backoff.
const DEFAULT_RETRIES: u32 = 5;

/// Statuses the dispatcher accepts as success.
const OK_STATUSES: [StatusCode; 4] = [
    StatusCode::OK,
    StatusCode::CREATED,
    StatusCode::ACCEPTED,
    StatusCode::NO_CONTENT,
];

/// Configuration for a [`Connection`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Where to persist the refresh token. `None` disables persistence.
    pub token_file_path: Option<PathBuf>,
    /// A previously saved refresh token; takes precedence over the file.
    pub saved_refresh_token: Option<String>,
    pub transport: TransportConfig,
    pub endpoints: EndpointUrls,
}

/// The authenticated HTTP connection to the Tado cloud.
///
/// All mutating operations take `&mut self`: the borrow checker rules
/// out two overlapping calls racing on the refresh deadline or the
/// bearer token. To share a connection across tasks, wrap it in a
/// `tokio::sync::Mutex`.
pub struct Connection {
    transport: TransportConfig,
    endpoints: EndpointUrls,
    http: reqwest::Client,
    tokens: TokenStore,
    token_file_path: Option<PathBuf>,
    saved_refresh_token: Option<String>,
    home_id: Option<i64>,
    line_x: Option<bool>,
    status: ActivationStatus,
    flow: Option<DeviceFlow>,
}

impl Connection {
    /// Create an unauthenticated connection. Call [`connect`](Self::connect)
    /// next.
    pub fn new(config: ConnectionConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Ok(Self {
            transport: config.transport,
            endpoints: config.endpoints,
            http,
            tokens: TokenStore::default(),
            token_file_path: config.token_file_path,
            saved_refresh_token: config.saved_refresh_token,
            home_id: None,
            line_x: None,
            status: ActivationStatus::NotStarted,
            flow: None,
        })
    }

    // ── Read surface ─────────────────────────────────────────────────

    /// Where this connection is in the activation lifecycle.
    pub fn activation_status(&self) -> ActivationStatus {
        self.status
    }

    /// The user code to show a human, while activation is pending.
    pub fn user_code(&self) -> Option<&str> {
        self.flow.as_ref().map(|f| f.user_code.as_str())
    }

    /// The verification URL (user code included as a query parameter),
    /// while activation is pending.
    pub fn verification_url(&self) -> Option<&str> {
        self.flow.as_ref().map(|f| f.verification_url.as_str())
    }

    /// The full pending-flow state, while activation is pending.
    pub fn device_flow(&self) -> Option<&DeviceFlow> {
        self.flow.as_ref()
    }

    /// The home id, once resolved. Immutable for the life of the session.
    pub fn home_id(&self) -> Option<i64> {
        self.home_id
    }

    /// Whether the home is a LINE_X (new-generation) home. `None` until
    /// the generation detector has run.
    pub fn is_line_x(&self) -> Option<bool> {
        self.line_x
    }

    /// The current refresh token, for callers persisting it themselves.
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.refresh_token()
    }

    /// The endpoint set this connection talks to.
    pub fn endpoints(&self) -> &EndpointUrls {
        &self.endpoints
    }

    // ── Bootstrap ────────────────────────────────────────────────────

    /// Establish credentials.
    ///
    /// If a saved refresh token was supplied (or can be loaded from the
    /// token file), attempts a forced refresh and, on success, runs the
    /// post-activation follow-ups directly — no device flow needed. If
    /// the saved token is rejected, or none exists, starts the device
    /// flow; the caller should surface [`verification_url`](Self::verification_url)
    /// and then [`activate`](Self::activate).
    pub async fn connect(&mut self) -> Result<ActivationStatus, Error> {
        let saved = match self.saved_refresh_token.take() {
            Some(saved) => Some(saved),
            None => match &self.token_file_path {
                Some(path) => token::load_refresh_token(path)?,
                None => None,
            },
        };

        if let Some(saved) = saved {
            self.tokens = TokenStore::with_refresh_token(saved);
            if self.refresh_access_token(true).await? {
                self.finish_activation().await?;
                return Ok(self.status);
            }
            warn!("saved refresh token was rejected, falling back to device activation");
            self.tokens = TokenStore::default();
        }

        self.begin_device_flow().await?;
        Ok(self.status)
    }

    // ── Device activation state machine ──────────────────────────────

    /// Start the device-authorization flow (`NotStarted → Pending`).
    ///
    /// Obtains a user code and verification URL for the caller to
    /// surface to a human. Starting twice is an error.
    pub async fn begin_device_flow(&mut self) -> Result<(), Error> {
        if self.status != ActivationStatus::NotStarted {
            return Err(Error::Activation {
                message: "device activation has already been started".into(),
            });
        }

        let url = self.endpoints.device_authorize_url();
        let response = self
            .http
            .post(&url)
            .query(&[("client_id", CLIENT_ID_DEVICE), ("scope", "offline_access")])
            .header(CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log_response(&Method::POST, &url, status, &body);

        if status != StatusCode::OK {
            return Err(Error::Activation {
                message: format!("device authorization failed (HTTP {status}): {body}"),
            });
        }

        let authorization: DeviceAuthorization = decode(&body)?;
        let flow = DeviceFlow::from_authorization(&authorization, Utc::now());
        info!(
            url = %flow.verification_url,
            expires_at = %flow.expires_at,
            "waiting for the user to authorize this device"
        );

        self.flow = Some(flow);
        self.status = ActivationStatus::Pending;
        Ok(())
    }

    /// One polling step of the pending flow.
    ///
    /// Sleeps the server-mandated interval, then asks the token endpoint
    /// whether the user has authorized the device yet. Returns `true`
    /// once tokens have been obtained, `false` while authorization is
    /// still pending. Fails without a network call if the user code has
    /// expired.
    pub async fn poll_activation(&mut self) -> Result<bool, Error> {
        let flow = self
            .flow
            .as_ref()
            .ok_or_else(|| Error::Activation {
                message: "device activation has not been started".into(),
            })?
            .clone();

        if Utc::now() > flow.expires_at {
            return Err(Error::Activation {
                message: "user took too long to authorize the device".into(),
            });
        }

        // The sole intentional suspension point in the core.
        tokio::time::sleep(Duration::from_secs(flow.interval_secs)).await;

        let url = self.endpoints.token_url();
        let response = self
            .http
            .post(&url)
            .query(&[
                ("client_id", CLIENT_ID_DEVICE),
                ("device_code", flow.device_code.as_str()),
                ("grant_type", DEVICE_CODE_GRANT),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log_response(&Method::POST, &url, status, &body);

        if status == StatusCode::OK {
            let token_response: TokenResponse = decode(&body)?;
            self.apply_token_response(&token_response)?;
            return Ok(true);
        }

        if status == StatusCode::BAD_REQUEST && oauth_error_code(&body).as_deref() == Some("authorization_pending") {
            info!("authorization pending, continuing to poll");
            return Ok(false);
        }

        Err(Error::Activation {
            message: format!("device login failed (HTTP {status}): {body}"),
        })
    }

    /// Poll until the user authorizes the device, then complete the
    /// session (`Pending → Completed`).
    ///
    /// Blocks the calling task for as long as the user takes; drop the
    /// future to abandon the wait.
    pub async fn activate(&mut self) -> Result<(), Error> {
        match self.status {
            ActivationStatus::NotStarted => {
                return Err(Error::Activation {
                    message: "device activation has not been started".into(),
                });
            }
            ActivationStatus::Completed => return Ok(()),
            ActivationStatus::Pending => {}
        }

        while !self.poll_activation().await? {}

        self.finish_activation().await
    }

    /// One-time follow-ups after credentials exist: resolve the home id,
    /// detect the backend generation, drop the ephemeral flow state.
    async fn finish_activation(&mut self) -> Result<(), Error> {
        let home_id = self.resolve_home_id().await?;
        self.home_id = Some(home_id);

        let line_x = self.detect_generation().await?;
        self.line_x = Some(line_x);

        self.flow = None;
        self.status = ActivationStatus::Completed;
        info!(home_id, line_x, "device activation completed");
        Ok(())
    }

    async fn resolve_home_id(&mut self) -> Result<i64, Error> {
        #[derive(Deserialize)]
        struct Me {
            homes: Vec<HomeRef>,
        }
        #[derive(Deserialize)]
        struct HomeRef {
            id: i64,
        }

        let request = ApiRequest {
            domain: Domain::Me,
            ..ApiRequest::new()
        };
        let me: Me = self.request_as(&request).await?;
        me.homes
            .first()
            .map(|home| home.id)
            .ok_or_else(|| Error::Activation {
                message: "the authenticated account has no homes".into(),
            })
    }

    /// One-time check of the home's root metadata document deciding
    /// which backend dialect this session uses: new-generation if and
    /// only if the `generation` field equals `"LINE_X"` exactly.
    async fn detect_generation(&mut self) -> Result<bool, Error> {
        let request = ApiRequest {
            command: Some(String::new()),
            ..ApiRequest::new()
        };
        let home = self.request(&request).await?;
        Ok(home.get("generation").and_then(Value::as_str) == Some("LINE_X"))
    }

    // ── Token refresh scheduler ──────────────────────────────────────

    /// Guarantee the access token is valid before an outbound call.
    ///
    /// No-op while the (skewed) refresh deadline is in the future unless
    /// `force` is set. On a rejected refresh: `force` reports `false`
    /// (bootstrap fallback), non-`force` raises
    /// [`Error::WrongCredentials`] — an unrecoverable condition
    /// mid-session. A connection-level failure raises
    /// [`Error::Transport`] either way.
    pub async fn ensure_fresh(&mut self, force: bool) -> Result<bool, Error> {
        self.refresh_access_token(force).await
    }

    async fn refresh_access_token(&mut self, force: bool) -> Result<bool, Error> {
        if !force && self.tokens.is_fresh(Utc::now()) {
            return Ok(true);
        }

        let Some(refresh_token) = self.tokens.refresh_token() else {
            if force {
                return Ok(false);
            }
            return Err(Error::WrongCredentials {
                message: "no refresh token available".into(),
            });
        };

        // The refresh call is connection-sensitive: tear the client down
        // and rebuild before issuing it.
        self.http = self.transport.build_client()?;

        let url = self.endpoints.token_url();
        let response = self
            .http
            .post(&url)
            .query(&[
                ("client_id", CLIENT_ID_DEVICE),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .header(CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log_response(&Method::POST, &url, status, &body);

        if status != StatusCode::OK {
            if force {
                warn!(status = status.as_u16(), "token refresh rejected, probably a stale refresh token");
                return Ok(false);
            }
            return Err(Error::WrongCredentials {
                message: format!("token refresh rejected (HTTP {status})"),
            });
        }

        let token_response: TokenResponse = decode(&body)?;
        self.apply_token_response(&token_response)?;
        Ok(true)
    }

    /// Common token-setter for both grant types: store the tokens,
    /// compute the skewed refresh deadline, persist the refresh token.
    fn apply_token_response(&mut self, response: &TokenResponse) -> Result<(), Error> {
        self.tokens.apply(response, Utc::now());
        if let Some(path) = &self.token_file_path {
            token::save_refresh_token(path, &response.refresh_token)?;
        }
        Ok(())
    }

    // ── Retrying dispatcher ──────────────────────────────────────────

    /// Send one logical API call and return the decoded JSON.
    ///
    /// Refreshes the token first, builds the URL and body, then sends
    /// with a fixed retry budget for transient connection failures —
    /// the session is recreated wholesale before each retry. Any HTTP
    /// response ends the retry loop; a non-OK status is an
    /// [`Error::Api`]. An empty body decodes to `{}`.
    pub async fn request(&mut self, request: &ApiRequest) -> Result<Value, Error> {
        self.ensure_fresh(false).await?;

        let url = request::build_url(request, self.home_id, &self.endpoints)?;
        let method = request::http_method(request.action, request.generation);
        let payload = request::encode_payload(request)?;

        let mut retries_left = DEFAULT_RETRIES;
        let response = loop {
            let mut builder = self.http.request(method.clone(), url.clone());
            if let Some(bearer) = self.tokens.bearer_header() {
                builder = builder.header(AUTHORIZATION, bearer);
            }
            if let Some(payload) = &payload {
                builder = builder
                    .header(CONTENT_TYPE, payload.content_type)
                    .header(MIME_TYPE_HEADER, MIME_TYPE_JSON)
                    .body(payload.body.clone());
            }

            debug!(%method, %url, "dispatching request");
            match builder.send().await {
                Ok(response) => break response,
                Err(err) if is_transient(&err) => {
                    if retries_left == 0 {
                        return Err(Error::ConnectionFailed {
                            retries: DEFAULT_RETRIES,
                            source: err,
                        });
                    }
                    warn!(%url, retries_left, error = %err, "transient connection failure, recreating session");
                    retries_left -= 1;
                    self.http = self.transport.build_client()?;
                }
                Err(err) => return Err(Error::Transport(err)),
            }
        };

        let status = response.status();
        let body = response.text().await?;
        log_response(&method, url.as_str(), status, &body);

        if body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        if !OK_STATUSES.contains(&status) {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        decode(&body)
    }

    /// [`request`](Self::request), deserialized into a typed model.
    pub async fn request_as<T: DeserializeOwned>(&mut self, request: &ApiRequest) -> Result<T, Error> {
        let value = self.request(request).await?;
        T::deserialize(&value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Connection-level failures worth retrying; everything else (including
/// any HTTP response) is not.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

fn oauth_error_code(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(ToOwned::to_owned)
}

fn log_response(method: &Method, url: &str, status: StatusCode, body: &str) {
    debug!(%method, url, status = status.as_u16(), body, "response received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        Connection::new(ConnectionConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn activate_before_begin_is_an_error() {
        let mut conn = connection();
        let err = conn.activate().await.unwrap_err();
        assert!(matches!(err, Error::Activation { .. }));
    }

    #[tokio::test]
    async fn poll_before_begin_is_an_error() {
        let mut conn = connection();
        let err = conn.poll_activation().await.unwrap_err();
        assert!(matches!(err, Error::Activation { .. }));
    }

    #[tokio::test]
    async fn begin_twice_is_an_error_without_a_network_call() {
        let mut conn = connection();
        // Force the state forward; the double-start check fires before
        // any request is built, so no server is needed.
        conn.status = ActivationStatus::Pending;
        let err = conn.begin_device_flow().await.unwrap_err();
        assert!(matches!(err, Error::Activation { .. }));
    }

    #[tokio::test]
    async fn expired_user_code_fails_without_a_network_call() {
        let mut conn = connection();
        conn.status = ActivationStatus::Pending;
        conn.flow = Some(DeviceFlow {
            device_code: "device".into(),
            user_code: "CODE".into(),
            verification_url: "https://example.com?user_code=CODE".into(),
            interval_secs: 0,
            expires_at: Utc::now() - chrono::Duration::seconds(1),
        });

        let err = conn.poll_activation().await.unwrap_err();
        assert!(matches!(err, Error::Activation { .. }));
    }

    #[tokio::test]
    async fn refresh_without_token_is_wrong_credentials() {
        let mut conn = connection();
        let err = conn.ensure_fresh(false).await.unwrap_err();
        assert!(matches!(err, Error::WrongCredentials { .. }));
    }

    #[tokio::test]
    async fn forced_refresh_without_token_reports_failure() {
        let mut conn = connection();
        assert!(!conn.ensure_fresh(true).await.unwrap());
    }
}
