//! Error types for todo-export

use crate::task::TaskId;
use thiserror::Error;

/// Main error type for todo-export
#[derive(Debug, Error)]
pub enum TodoError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Task not found (or not owned by the current user)
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export format tag outside json/csv/ical/markdown
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The delivery sink rejected an artifact
    #[error("Failed to deliver '{filename}': {message}")]
    Delivery { filename: String, message: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TodoError>,
    },
}

impl TodoError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TodoError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for TodoError {
    fn from(err: toml::de::Error) -> Self {
        TodoError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for TodoError {
    fn from(err: toml::ser::Error) -> Self {
        TodoError::Toml(err.to_string())
    }
}

/// Result type alias for todo-export
pub type Result<T> = std::result::Result<T, TodoError>;
