//! Client configuration with sensible defaults.
//!
//! [`ClientConfig`] controls where the search service lives, how long a
//! single request may take, and how pagination metadata is interpreted.

use crate::error::SearchError;
use crate::types::PaginationMode;
use serde::{Deserialize, Serialize};

/// Default base URL of the search service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Upper bound the search service accepts for `per_page`.
pub const MAX_PER_PAGE: u32 = 1000;

/// Configuration for [`crate::SearchClient`].
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the search service, without the `/search` path.
    pub base_url: String,
    /// Per-request timeout in seconds. Covers connect, send and body read.
    pub timeout_secs: u64,
    /// Results requested per page.
    pub per_page: u32,
    /// How `has_next`/`has_previous` from the server are treated.
    pub pagination_mode: PaginationMode,
    /// Custom User-Agent. If `None`, `sift/<version>` is sent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 15,
            per_page: 10,
            pagination_mode: PaginationMode::Server,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the pagination mode.
    pub fn with_pagination_mode(mut self, mode: PaginationMode) -> Self {
        self.pagination_mode = mode;
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` parses as an `http` or `https` URL
    /// - `timeout_secs` must be greater than 0
    /// - `per_page` must be within `1..=MAX_PER_PAGE`
    pub fn validate(&self) -> Result<(), SearchError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SearchError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(SearchError::Config(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(())
    }

    /// Join `path` onto the base URL, tolerating a trailing slash.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.per_page, 10);
        assert_eq!(config.pagination_mode, PaginationMode::Server);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn per_page_bounds_enforced() {
        for per_page in [0, MAX_PER_PAGE + 1] {
            let config = ClientConfig {
                per_page,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("per_page"));
        }
        let config = ClientConfig {
            per_page: MAX_PER_PAGE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_base_url_rejected() {
        let config = ClientConfig::default().with_base_url("not a url");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let config = ClientConfig::default().with_base_url("ftp://search.local");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = ClientConfig::default().with_base_url("http://search.local:9000/");
        assert_eq!(config.endpoint("/search"), "http://search.local:9000/search");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://api.example","pagination_mode":"inferred"}"#)
                .expect("deserialize");
        assert_eq!(config.base_url, "https://api.example");
        assert_eq!(config.pagination_mode, PaginationMode::Inferred);
        assert_eq!(config.per_page, 10);
    }
}
