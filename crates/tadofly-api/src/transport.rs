// Shared transport configuration for building reqwest::Client instances.
//
// The connection is exclusively owned by the core and recreated wholesale
// (closed, replaced) on every token refresh and every retried connection
// failure. This module is the single place clients are built, so each
// recreation is a full teardown/rebuild with identical settings.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::error::Error;

/// Referer sent on every call; the backend rejects requests without it.
pub(crate) const APP_REFERER: &str = "https://app.tado.com/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn default_user_agent() -> String {
    format!("tadofly/{}", env!("CARGO_PKG_VERSION"))
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl TransportConfig {
    /// Build a fresh `reqwest::Client` from this config.
    ///
    /// `Referer` and the user agent ride along as default headers;
    /// the bearer header is applied per request because it changes on
    /// every token refresh.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(APP_REFERER));
        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)
    }

    /// Override the user agent (e.g. for integrations embedding this crate).
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
