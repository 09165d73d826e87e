//! Backend connection configuration

use super::defaults::*;
use super::parse_duration_secs_from_env;
use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Where the console finds the KubeKey backend service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Host name or IP address of the backend
    pub host: String,

    /// Port serving both the HTTP and the streaming endpoints
    pub port: u16,

    /// Use https/wss instead of http/ws
    pub tls: bool,

    /// Timeout for read-side HTTP requests. Streaming sessions never time out.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BACKEND_HOST.to_string(),
            port: DEFAULT_BACKEND_PORT,
            tls: false,
            request_timeout: duration_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> ConsoleResult<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("KKCONSOLE_BACKEND_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("KKCONSOLE_BACKEND_PORT") {
            config.port = port.parse().map_err(|_| {
                ConsoleError::configuration("backend.port", format!("Invalid port '{}'", port))
            })?;
        }

        if let Ok(tls) = std::env::var("KKCONSOLE_BACKEND_TLS") {
            config.tls = matches!(tls.as_str(), "1" | "true" | "yes");
        }

        config.request_timeout =
            parse_duration_secs_from_env("KKCONSOLE_REQUEST_TIMEOUT_SECS", config.request_timeout);

        Ok(config)
    }

    pub fn validate(&self) -> ConsoleResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConsoleError::configuration("backend.host", "host must not be empty"));
        }
        if self.port == 0 {
            return Err(ConsoleError::configuration("backend.port", "port must be non-zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConsoleError::configuration(
                "backend.request_timeout",
                "timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Base URL for the read-side HTTP endpoints
    pub fn http_base(&self) -> ConsoleResult<Url> {
        let scheme = if self.tls { "https" } else { "http" };
        Ok(Url::parse(&format!("{}://{}:{}/", scheme, self.host, self.port))?)
    }

    /// URL of a streaming operation endpoint, without query parameters
    pub fn stream_endpoint(&self, path: &str) -> ConsoleResult<Url> {
        let scheme = if self.tls { "wss" } else { "ws" };
        Ok(Url::parse(&format!(
            "{}://{}:{}/{}",
            scheme, self.host, self.port, path
        ))?)
    }
}
