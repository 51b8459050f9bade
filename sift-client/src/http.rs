//! Shared HTTP client construction.
//!
//! Provides a configured [`reqwest::Client`] with the request timeout and
//! User-Agent taken from [`ClientConfig`].

use crate::config::ClientConfig;
use crate::error::SearchError;
use std::time::Duration;

/// User-Agent sent when the config does not override it.
pub fn default_user_agent() -> String {
    format!("sift/{}", env!("CARGO_PKG_VERSION"))
}

/// Build a [`reqwest::Client`] configured for the search API.
///
/// The client has:
/// - Timeout from config (applies to the whole request, body included)
/// - User-Agent from config, or [`default_user_agent`]
/// - gzip decompression
/// - A bounded redirect policy
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => default_user_agent(),
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}
