//! HTTP implementation of [`SearchBackend`] for the remote search API.

use crate::backend::SearchBackend;
use crate::catalog::{engines_from_wire, Catalog, CategoriesResponse, EngineTable};
use crate::config::ClientConfig;
use crate::error::SearchError;
use crate::http::build_client;
use crate::types::{EngineDescriptor, PaginationMode, SearchPage, SearchRequest};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Thin client over `POST /search`, `GET /search/categories` and
/// `GET /search/engines`.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SearchClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .field("pagination_mode", &self.config.pagination_mode)
            .finish()
    }
}

impl SearchClient {
    /// Create a client after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let http = build_client(&config)?;
        Ok(Self { config, http })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SearchError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "fetching search metadata");
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }
}

impl SearchBackend for SearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let url = self.config.endpoint("/search");
        tracing::debug!(
            page = request.page,
            per_page = request.per_page,
            category = ?request.category,
            engines = request.engines.len(),
            "issuing search request"
        );
        tracing::trace!(query = %request.query, "search query");

        let response = self.http.post(&url).json(request).send().await?;
        let page: SearchPage = read_json(response).await?;

        tracing::debug!(
            results = page.results.len(),
            total = page.number_of_results,
            "search request completed"
        );
        Ok(page)
    }

    async fn fetch_categories(&self) -> Result<Catalog, SearchError> {
        let body: CategoriesResponse = self.get_json("/search/categories").await?;
        Ok(body.into_catalog())
    }

    async fn fetch_engines(&self) -> Result<EngineTable, SearchError> {
        let body: HashMap<String, Vec<EngineDescriptor>> =
            self.get_json("/search/engines").await?;
        Ok(engines_from_wire(body))
    }

    fn pagination_mode(&self) -> PaginationMode {
        self.config.pagination_mode
    }

    fn per_page(&self) -> u32 {
        self.config.per_page
    }
}

/// Check the status and decode a JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SearchError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let err = map_http_error(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "search API returned an error");
        return Err(err);
    }
    serde_json::from_str(&body)
        .map_err(|e| SearchError::Decode(format!("invalid response body: {e}")))
}

/// Map a non-2xx status and body to [`SearchError::Api`].
pub(crate) fn map_http_error(status: u16, body: &str) -> SearchError {
    let detail = extract_detail(body).unwrap_or_else(|| status_message(status));
    SearchError::Api { status, detail }
}

/// Pull the `detail` field out of an error body.
///
/// Accepts a plain string, or a list of validation errors each carrying a
/// `msg` field (joined with `"; "`).
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn status_message(status: u16) -> String {
    match status {
        400 => "invalid search request".to_owned(),
        404 => "search endpoint not found".to_owned(),
        408 | 504 => "search request timed out".to_owned(),
        422 => "invalid search parameters".to_owned(),
        429 => "too many requests".to_owned(),
        500..=599 => format!("search service unavailable (HTTP {status})"),
        _ => format!("HTTP error! status: {status}"),
    }
}
