//! Common error types for PodFeed

use thiserror::Error;

/// Common result type for PodFeed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the PodFeed crates
#[derive(Error, Debug)]
pub enum Error {
    /// Repository (external persistence collaborator) failure
    #[error("Repository error: {0}")]
    Repository(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error (wraps serde_json::Error)
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
