use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `tadofly-api` crate.
///
/// Covers every failure mode across the auth core and the domain layers:
/// device activation, token refresh, transport, API status errors, and
/// token-file persistence. Consumers (CLI) map these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Device activation ───────────────────────────────────────────
    /// The device-authorization flow was misused (not started / started
    /// twice / user code expired) or an auth endpoint answered with
    /// something other than success or `authorization_pending`.
    #[error("Device activation failed: {message}")]
    Activation { message: String },

    // ── Credentials ─────────────────────────────────────────────────
    /// A non-forced token refresh was rejected. The refresh token is
    /// invalid or expired; the session cannot recover without
    /// re-running device activation.
    #[error("Wrong credentials: {message}")]
    WrongCredentials { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    /// outside the dispatch retry loop, or a non-transient send failure
    /// inside it.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The dispatch retry budget was exhausted by transient connection
    /// failures.
    #[error("Connection failed after {retries} retries: {source}")]
    ConnectionFailed {
        retries: u32,
        #[source]
        source: reqwest::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// A resource endpoint answered with a non-OK status code.
    #[error("API request failed with status code {status}: {body}")]
    Api { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The request descriptor needs an identifier this session does not
    /// have (home id before activation, device id for a device-scoped
    /// domain).
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    // ── Persistence ─────────────────────────────────────────────────
    /// Reading or writing the refresh-token file failed. Losing the
    /// refresh token silently would be worse than failing loudly, so
    /// this is raised, never logged-and-ignored.
    #[error("Token file {path}: {message}")]
    TokenFile { path: PathBuf, message: String },
}

impl Error {
    /// Returns `true` if this error means re-authentication might help.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::WrongCredentials { .. } | Self::Api { status: 401, .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::ConnectionFailed { .. } => true,
            _ => false,
        }
    }
}
