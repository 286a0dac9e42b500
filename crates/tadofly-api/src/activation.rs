// Device-authorization grant state.
//
// Wire types for the OAuth2 device_authorize response and the ephemeral
// state the connection holds while activation is pending.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::form_urlencoded;

/// Where a connection is in the device-activation lifecycle.
///
/// Transitions are monotonic and forward-only:
/// `NotStarted → Pending → Completed`. `Completed` is terminal for the
/// life of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationStatus {
    #[default]
    NotStarted,
    Pending,
    Completed,
}

/// Response from the device-authorization endpoint.
#[derive(Debug, Deserialize)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    /// Seconds to wait between polls. Absent means poll immediately.
    #[serde(default)]
    pub interval: u64,
}

/// Ephemeral state held while activation is `Pending`; dropped once the
/// flow completes.
#[derive(Debug, Clone)]
pub struct DeviceFlow {
    pub device_code: String,
    pub user_code: String,
    /// Verification URL with the user code appended as a query
    /// parameter, ready to hand to a human.
    pub verification_url: String,
    pub interval_secs: u64,
    pub expires_at: DateTime<Utc>,
}

impl DeviceFlow {
    /// Build the pending-flow state from an authorization response.
    pub fn from_authorization(auth: &DeviceAuthorization, now: DateTime<Utc>) -> Self {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("user_code", &auth.user_code)
            .finish();
        Self {
            device_code: auth.device_code.clone(),
            user_code: auth.user_code.clone(),
            verification_url: format!("{}?{query}", auth.verification_uri),
            interval_secs: auth.interval,
            expires_at: add_seconds_saturating(now, auth.expires_in),
        }
    }
}

/// `now + secs`, pinned to the far future on overflow rather than
/// panicking on a hostile `expires_in`.
fn add_seconds_saturating(now: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
