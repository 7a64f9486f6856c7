//! Error types for the Biblio service.

use thiserror::Error;

/// Main error type for Biblio operations.
#[derive(Error, Debug)]
pub enum BiblioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rate limit policy that cannot be enforced
    #[error("Invalid rate limit policy: {0}")]
    InvalidPolicy(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for BiblioError {
    fn from(err: config::ConfigError) -> Self {
        BiblioError::Config(err.to_string())
    }
}

/// Result type alias for Biblio operations.
pub type Result<T> = std::result::Result<T, BiblioError>;
