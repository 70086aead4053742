//! Error types for the log handler

pub type Result<T> = std::result::Result<T, HandlerError>;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error, usually a failed write to the sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Level text that is neither a severity name nor a number
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),
}

impl HandlerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        HandlerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        HandlerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid level error
    pub fn invalid_level(text: impl Into<String>) -> Self {
        HandlerError::InvalidLevel(text.into())
    }

    /// Whether this error came from the output sink
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            HandlerError::Io(_) | HandlerError::IoOperation { .. }
        )
    }
}
