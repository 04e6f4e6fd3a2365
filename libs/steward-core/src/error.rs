//! Error types for the Steward Core library

use thiserror::Error;

/// Result type alias for Steward operations
pub type Result<T> = std::result::Result<T, StewardError>;

/// Main error type for Steward operations
#[derive(Error, Debug)]
pub enum StewardError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {uuid}")]
    TaskNotFound { uuid: String },

    #[error("Saved filter not found: {uuid}")]
    FilterNotFound { uuid: String },

    #[error("Invalid date: {date}")]
    InvalidDate { date: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl StewardError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }
}
