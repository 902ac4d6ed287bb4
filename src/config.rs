//! Client configuration.
//!
//! ```ignore
//! let config = ClientConfig::from_env()?.with_request_timeout(Duration::from_secs(5));
//! ```

use std::fmt;
use std::time::Duration;

/// Primary variable for the API base URL.
pub const API_URL_VAR: &str = "TASKHUB_API_URL";
/// Fallback variable, shared with the mobile app's `.env`.
pub const LEGACY_API_URL_VAR: &str = "API_URL";
/// Request timeout in whole seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "TASKHUB_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    Invalid { name: String, reason: String },
    /// The HTTP client could not be built.
    Client(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { name, reason } => {
                write!(f, "invalid configuration {}: {}", name, reason)
            }
            ConfigError::Client(msg) => write!(f, "failed to build http client: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every route is appended to (e.g. `https://api.example.com/api`).
    pub api_url: String,
    /// Upper bound for one request, connection included.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("taskhub_sync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Read the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config through `lookup`, falling back to defaults for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR).or_else(|| lookup(LEGACY_API_URL_VAR)) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: REQUEST_TIMEOUT_VAR.to_string(),
                reason: format!("expected whole seconds, got {:?}", raw),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "api_url".to_string(),
                reason: format!("expected an http(s) URL, got {:?}", self.api_url),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "request_timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn primary_variable_wins_over_legacy() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.example.com"),
            (LEGACY_API_URL_VAR, "http://old.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com");

        let legacy =
            ClientConfig::from_lookup(lookup(&[(LEGACY_API_URL_VAR, "http://old.example.com")]))
                .unwrap();
        assert_eq!(legacy.api_url, "http://old.example.com");
    }

    #[test]
    fn rejects_bad_timeout_and_url() {
        let err = ClientConfig::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = ClientConfig::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "0")])).unwrap_err();
        assert!(err.to_string().contains("request_timeout"));

        let err = ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "ftp://x")])).unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }
}
