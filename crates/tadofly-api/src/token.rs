// Token storage and persistence.
//
// Holds the bearer access token, the long-lived refresh token, and the
// "must refresh no later than" instant. The access token is never written
// to disk; the refresh token is, when a token file path is configured.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Safety margin subtracted from the token's real expiry so refresh
/// happens slightly early and an in-flight request never races the
/// server-side expiration.
const REFRESH_SKEW_SECONDS: i64 = 30;

/// Successful response from the OAuth2 token endpoint (both the
/// refresh-token and device-code grants).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

/// Session credentials: access token, refresh token, refresh deadline.
///
/// Mutated only by the refresh scheduler and the activation flow.
#[derive(Debug, Default)]
pub struct TokenStore {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    refresh_at: Option<DateTime<Utc>>,
}

impl TokenStore {
    /// Seed the store with a previously saved refresh token.
    pub fn with_refresh_token(token: impl Into<String>) -> Self {
        Self {
            refresh_token: Some(SecretString::from(token.into())),
            ..Self::default()
        }
    }

    /// Whether the access token is still valid at `now`.
    ///
    /// `refresh_at` sits a fixed skew before the real expiry, so "fresh"
    /// here already includes the safety margin.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.refresh_at.is_some_and(|at| at > now)
    }

    /// Apply a token endpoint response: store both tokens and set
    /// `refresh_at = now + expires_in − skew`.
    pub fn apply(&mut self, response: &TokenResponse, now: DateTime<Utc>) {
        self.access_token = Some(SecretString::from(response.access_token.clone()));
        self.refresh_token = Some(SecretString::from(response.refresh_token.clone()));
        // Refresh 30 seconds before the token actually expires, leaving
        // that window to obtain the replacement.
        let expiry = i64::try_from(response.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.refresh_at = Some(expiry - Duration::seconds(REFRESH_SKEW_SECONDS));
    }

    /// The `Authorization: Bearer ...` header for the current access
    /// token, marked sensitive so it never shows up in logs.
    pub fn bearer_header(&self) -> Option<HeaderValue> {
        let token = self.access_token.as_ref()?;
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).ok()?;
        value.set_sensitive(true);
        Some(value)
    }

    /// The current refresh token, for callers that persist it themselves.
    pub fn refresh_token(&self) -> Option<String> {
        self.refresh_token
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
    }

    /// The computed refresh deadline, if a token has been obtained.
    pub fn refresh_at(&self) -> Option<DateTime<Utc>> {
        self.refresh_at
    }
}

// ── Token file ───────────────────────────────────────────────────────

/// On-disk shape of the token file.
#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    refresh_token: String,
}

/// Read the refresh token from `path`. Returns `Ok(None)` when the file
/// does not exist; a file that exists but cannot be read or parsed is an
/// error.
pub fn load_refresh_token(path: &Path) -> Result<Option<String>, Error> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::TokenFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let file: TokenFile = serde_json::from_str(&contents).map_err(|e| Error::TokenFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), "refresh token loaded");
    Ok(Some(file.refresh_token))
}

/// Write the refresh token to `path`, creating parent directories as
/// needed. Failures are raised, not logged away — losing the refresh
/// token means re-running device activation.
pub fn save_refresh_token(path: &Path, refresh_token: &str) -> Result<(), Error> {
    let wrap = |e: std::io::Error| Error::TokenFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
    }

    let contents = serde_json::to_string(&TokenFile {
        refresh_token: refresh_token.to_owned(),
    })
    .map_err(|e| Error::TokenFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, contents).map_err(wrap)?;

    debug!(path = %path.display(), "refresh token saved");
    Ok(())
}
