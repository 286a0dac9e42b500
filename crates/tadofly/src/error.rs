//! CLI error types with miette diagnostics.
//!
//! Maps `tadofly_api::Error` variants into user-facing errors with
//! actionable help text, so "please re-authenticate" and "network
//! problem, retry" stay distinguishable at a glance.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Device activation failed: {message}")]
    #[diagnostic(
        code(tado::activation_failed),
        help("Run: tado login\nand approve the device at the printed URL.")
    )]
    Activation { message: String },

    #[error("Authentication expired: {message}")]
    #[diagnostic(
        code(tado::auth_expired),
        help("The stored refresh token is no longer valid.\nRun: tado login")
    )]
    AuthExpired { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Tado cloud")]
    #[diagnostic(
        code(tado::connection_failed),
        help("Check your network connection and try again.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(tado::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from the API: {message}")]
    #[diagnostic(code(tado::unexpected_response))]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tado::validation))]
    Validation { field: String, reason: String },

    // ── Persistence / configuration ──────────────────────────────────
    #[error("Token file problem: {message}")]
    #[diagnostic(
        code(tado::token_file),
        help("Check permissions on the token file path, or point --token-file elsewhere.")
    )]
    TokenFile { message: String },

    #[error("Configuration problem: {0}")]
    #[diagnostic(code(tado::config))]
    Config(#[from] tadofly_config::ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(tado::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Activation { .. } | Self::AuthExpired { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── tadofly_api::Error → CliError mapping ────────────────────────────

impl From<tadofly_api::Error> for CliError {
    fn from(err: tadofly_api::Error) -> Self {
        use tadofly_api::Error;

        match err {
            Error::Activation { message } => CliError::Activation { message },

            Error::WrongCredentials { message } => CliError::AuthExpired { message },

            Error::Transport(source) => CliError::ConnectionFailed {
                source: source.into(),
            },

            Error::ConnectionFailed { retries, source } => CliError::ConnectionFailed {
                source: format!("gave up after {retries} retries: {source}").into(),
            },

            Error::Api { status, body } => CliError::ApiError {
                status,
                message: body,
            },

            Error::Deserialization { message, .. } => CliError::UnexpectedResponse { message },

            Error::InvalidUrl(source) => CliError::Validation {
                field: "url".into(),
                reason: source.to_string(),
            },

            Error::InvalidRequest { reason } => CliError::Validation {
                field: "request".into(),
                reason,
            },

            Error::TokenFile { path, message } => CliError::TokenFile {
                message: format!("{}: {message}", path.display()),
            },
        }
    }
}
