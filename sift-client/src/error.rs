//! Error types for the sift-client crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Query text never appears in error messages.

/// Message shown when a failure carries no usable description.
pub const FALLBACK_MESSAGE: &str = "Failed to fetch results";

/// Errors that can occur while talking to the remote search API.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request never produced an HTTP response (DNS, connect, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-2xx status.
    #[error("API error (HTTP {status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided `detail`, or a message keyed by status.
        detail: String,
    },

    /// A 2xx response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Text placed in the controller's error slot.
    ///
    /// API errors surface the server's detail verbatim; transport errors
    /// keep their category prefix so users can tell "server said no" apart
    /// from "server unreachable".
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { detail, .. } => detail.trim().to_owned(),
            other => other.to_string(),
        };
        if message.is_empty() {
            FALLBACK_MESSAGE.to_owned()
        } else {
            message
        }
    }

    /// HTTP status for [`SearchError::Api`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else if e.is_builder() {
            Self::Config(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Convenience type alias for sift-client results.
pub type Result<T> = std::result::Result<T, SearchError>;
