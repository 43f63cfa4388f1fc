//! Error types for worklog-core

use thiserror::Error;

/// Result type alias for worklog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the worklog HTTP server
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid route pattern
    #[error("Invalid route pattern: {0}")]
    InvalidRoute(String),

    /// Invalid bind address
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
