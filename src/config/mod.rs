//! Configuration module for the dashboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration problems found at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend (REST and auth live under it)
    pub backend_url: String,
    /// Public anonymous key sent as `apikey` on every backend call
    pub backend_anon_key: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Where unauthenticated page requests are sent
    pub login_path: String,
    /// Per-request timeout for backend calls; transport default when unset
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            var(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let backend_url = required("DASHBOARD_BACKEND_URL")?;
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                var: "DASHBOARD_BACKEND_URL",
                value: backend_url,
                reason: "expected an http(s) URL".to_string(),
            });
        }
        let backend_anon_key = required("DASHBOARD_BACKEND_ANON_KEY")?;

        let bind_value = var("DASHBOARD_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr = bind_value
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "DASHBOARD_BIND_ADDR",
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let log_level = var("DASHBOARD_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let login_path = var("DASHBOARD_LOGIN_PATH").unwrap_or_else(|| "/login".to_string());

        let request_timeout = match var("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        var: "DASHBOARD_REQUEST_TIMEOUT_SECS",
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            backend_url,
            backend_anon_key,
            bind_addr,
            log_level,
            login_path,
            request_timeout,
        })
    }
}
