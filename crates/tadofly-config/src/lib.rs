//! Shared configuration for the tadofly CLI.
//!
//! TOML file + `TADO_`-prefixed environment variables, merged through
//! Figment, and translation to `tadofly_api::ConnectionConfig`. The
//! refresh token itself never lives here — it goes in the token file
//! the API crate manages.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tadofly_api::{ConnectionConfig, EndpointUrls, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Where the refresh token is persisted. Defaults to the platform
    /// data directory; set to an empty string to disable persistence.
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// Override the default user agent.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Endpoint overrides, for self-hosted proxies.
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_file: None,
            user_agent: None,
            timeout: default_timeout(),
            endpoints: Endpoints::default(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// Optional endpoint overrides; unset fields keep production defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Endpoints {
    #[serde(default)]
    pub my_api: Option<String>,
    #[serde(default)]
    pub hops_api: Option<String>,
    #[serde(default)]
    pub auth: Option<String>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tadofly")
}

/// Platform config file path (e.g. `~/.config/tadofly/config.toml`).
pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("tadofly.toml"))
}

/// Default token file path (e.g. `~/.local/share/tadofly/token.json`).
pub fn default_token_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("token.json"))
        .unwrap_or_else(|| PathBuf::from("tadofly-token.json"))
}

// ── Loading ─────────────────────────────────────────────────────────

impl Config {
    /// Merge defaults, the TOML file (if present), and `TADO_*`
    /// environment variables, lowest to highest precedence.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_path())
    }

    /// Same as [`load`](Self::load) with an explicit file path.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("TADO_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Translate into the API crate's connection config.
    pub fn to_connection_config(
        &self,
        saved_refresh_token: Option<String>,
    ) -> Result<ConnectionConfig, ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let mut transport = TransportConfig {
            timeout: Duration::from_secs(self.timeout),
            ..TransportConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            transport = transport.with_user_agent(user_agent.clone());
        }

        let mut endpoints = EndpointUrls::default();
        if let Some(my_api) = &self.endpoints.my_api {
            endpoints.my_api = ensure_trailing_slash(my_api);
        }
        if let Some(hops_api) = &self.endpoints.hops_api {
            endpoints.hops_api = ensure_trailing_slash(hops_api);
        }
        if let Some(auth) = &self.endpoints.auth {
            endpoints.auth = ensure_trailing_slash(auth);
        }

        let token_file_path = match &self.token_file {
            Some(path) if path.as_os_str().is_empty() => None,
            Some(path) => Some(path.clone()),
            None => Some(default_token_path()),
        };

        Ok(ConnectionConfig {
            token_file_path,
            saved_refresh_token,
            transport,
            endpoints,
        })
    }
}

/// URLs are joined by concatenation, so bases must end with `/`.
fn ensure_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_owned()
    } else {
        format!("{base}/")
    }
}
