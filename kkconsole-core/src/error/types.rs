//! Core error types for the console
//!
//! This module contains the main ConsoleError enum and the associated
//! Result alias.

use thiserror::Error;

/// Error type for console operations
#[derive(Error, Debug)]
pub enum ConsoleError {
    // Document store
    #[error("Invalid document path '{path}': {reason}")]
    DocumentPath { path: String, reason: String },

    #[error("Host not found: {name}")]
    HostNotFound { name: String },

    #[error("Host already exists: {name}")]
    DuplicateHost { name: String },

    #[error("Inconsistent inventory: {message}")]
    Inventory { message: String },

    #[error("Cluster not found: {name}")]
    ClusterNotFound { name: String },

    // Wizard and session
    #[error("Action '{action}' is not allowed: {reason}")]
    NavigationBlocked { action: String, reason: String },

    #[error("A streaming session is already active")]
    SessionBusy,

    #[error("Operation '{operation}' failed")]
    OperationFailed { operation: String },

    // Configuration
    #[error("Configuration error in {component}: {message}")]
    ConfigurationError {
        component: String,
        message: String,
    },

    // Network
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Serialization & IO
    #[error("Serialization operation '{operation}' failed")]
    Serialization {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] Box<std::io::Error>),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for console operations
pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
