//! Centralized error types for Herald.

use thiserror::Error;

/// Main error type for Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for Herald operations.
pub type HeraldResult<T> = Result<T, HeraldError>;

impl HeraldError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
