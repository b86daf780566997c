//! Error types for configuration

use thiserror::Error;

/// Errors raised while assembling per-invocation configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Must specify a {field}")]
    MissingField { field: &'static str },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
