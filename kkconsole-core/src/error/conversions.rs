//! Error conversion implementations for ConsoleError
//!
//! From implementations for external error types so that `?` works across
//! the serialization, transport and IO boundaries.

use super::types::ConsoleError;

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::IoError(Box::new(err))
    }
}

impl From<serde_yaml::Error> for ConsoleError {
    fn from(err: serde_yaml::Error) -> Self {
        ConsoleError::Serialization {
            operation: "yaml".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization {
            operation: "json".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        ConsoleError::ConfigurationError {
            component: "file".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ConsoleError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ConsoleError::Connection {
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ConsoleError {
    fn from(err: tokio::task::JoinError) -> Self {
        ConsoleError::Internal {
            message: format!("Task panicked or was cancelled: {}", err),
        }
    }
}
