//! Configuration for the console
//!
//! Structured configuration with defaults, a TOML file loader, environment
//! variable overrides and validation. The backend address lives here and is
//! handed to wizards and clients explicitly at construction time.

use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod backend;
pub mod defaults;
pub mod logging;
pub mod wizard;

pub use backend::BackendConfig;
pub use defaults::*;
pub use logging::LoggingConfig;
pub use wizard::WizardConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend service location
    pub backend: BackendConfig,

    /// Wizard defaults
    pub wizard: WizardConfig,

    /// Logging
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> ConsoleResult<Self> {
        let mut config = Self::default();
        config.backend = BackendConfig::from_env()?;

        if let Ok(namespace) = std::env::var("KKCONSOLE_KUBEKEY_NAMESPACE") {
            config.wizard.kubekey_namespace = namespace;
        }
        if let Ok(level) = std::env::var("KKCONSOLE_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> ConsoleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::configuration(
                "file",
                format!("Failed to read {}: {}", path.display(), e),
            )
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConsoleResult<()> {
        self.backend.validate()?;
        self.logging.validate()?;

        if self.wizard.kubekey_namespace.trim().is_empty() {
            return Err(ConsoleError::configuration(
                "wizard.kubekey_namespace",
                "namespace must not be empty",
            ));
        }
        Ok(())
    }

    /// Create a test configuration pointing at a local backend
    pub fn test(port: u16) -> Self {
        let mut config = Self::default();
        config.backend.host = "127.0.0.1".to_string();
        config.backend.port = port;
        config.backend.request_timeout = Duration::from_secs(2);
        config
    }
}

/// Builder for ConsoleConfig
pub struct ConsoleConfigBuilder {
    config: ConsoleConfig,
}

impl ConsoleConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConsoleConfig::default(),
        }
    }

    pub fn backend_host(mut self, host: impl Into<String>) -> Self {
        self.config.backend.host = host.into();
        self
    }

    pub fn backend_port(mut self, port: u16) -> Self {
        self.config.backend.port = port;
        self
    }

    pub fn tls(mut self, tls: bool) -> Self {
        self.config.backend.tls = tls;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.backend.request_timeout = timeout;
        self
    }

    pub fn kubekey_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.wizard.kubekey_namespace = namespace.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> ConsoleResult<ConsoleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConsoleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn parse_duration_secs_from_env(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
