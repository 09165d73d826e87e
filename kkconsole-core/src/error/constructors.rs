//! Constructor methods for ConsoleError

use super::types::ConsoleError;

impl ConsoleError {
    /// Create a configuration error with component and message
    ///
    /// # Examples
    /// ```rust
    /// use kkconsole_core::error::ConsoleError;
    ///
    /// let err = ConsoleError::configuration("backend.port", "port must be non-zero");
    /// assert!(err.to_string().contains("backend.port"));
    /// ```
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        ConsoleError::ConfigurationError {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a document path error
    pub fn document_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConsoleError::DocumentPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a navigation error for a blocked wizard action
    pub fn navigation_blocked(action: impl Into<String>, reason: impl Into<String>) -> Self {
        ConsoleError::NavigationBlocked {
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        ConsoleError::Connection {
            message: message.into(),
        }
    }

    pub fn inventory(message: impl Into<String>) -> Self {
        ConsoleError::Inventory {
            message: message.into(),
        }
    }

    /// Create a Serialization error with a boxed source
    pub fn serialization<E: std::error::Error + Send + Sync + 'static>(
        operation: impl Into<String>,
        source: E,
    ) -> Self {
        ConsoleError::Serialization {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ConsoleError::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from the network rather than from local state
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ConsoleError::Connection { .. } | ConsoleError::Http(_) | ConsoleError::InvalidUrl(_)
        )
    }
}
