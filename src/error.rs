//! Error types for the sift front end.

use sift_client::SearchError;

/// Top-level error type for configuration, the host bridge and the binary.
///
/// Search failures during a controller action never surface here; they are
/// stored in the state's error slot instead.
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Search client error outside a controller action (construction,
    /// metadata lookups).
    #[error(transparent)]
    Client(#[from] SearchError),

    /// Host bridge protocol error.
    #[error("bridge error: {0}")]
    Bridge(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SiftError>;
