//! Logging configuration

use super::defaults::*;
use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for the `kkconsole` targets (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConsoleResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConsoleError::configuration(
                "logging.level",
                format!("Unknown log level '{}'", other),
            )),
        }
    }
}
