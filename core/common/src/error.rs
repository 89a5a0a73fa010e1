//! Common error types for MediaStow.

use thiserror::Error;

/// Top-level error type for MediaStow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Provider configuration is unusable; raised at initialization only.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Declared payload size exceeds the configured ceiling.
    #[error("Payload too large: {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge {
        /// Declared payload size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
