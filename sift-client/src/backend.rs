//! Trait definition for the search service seam.
//!
//! The controller in the `sift` crate only talks to a [`SearchBackend`],
//! so it can be driven by the HTTP [`crate::SearchClient`] in production
//! and by scripted in-memory backends in tests.

use crate::catalog::{builtin_catalog, builtin_engines, Catalog, EngineTable};
use crate::error::SearchError;
use crate::types::{PaginationMode, SearchPage, SearchRequest};
use std::future::Future;

/// A remote search service.
///
/// Each call is a single attempt: implementations must not retry or cache.
/// All implementations must be `Send + Sync` so a controller can be shared
/// between tasks.
pub trait SearchBackend: Send + Sync {
    /// Run one search and return one page of results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails in transport, times out,
    /// the server answers with a non-2xx status, or the body is malformed.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchPage, SearchError>> + Send;

    /// Category metadata. Defaults to the built-in table.
    fn fetch_categories(&self) -> impl Future<Output = Result<Catalog, SearchError>> + Send {
        async { Ok(builtin_catalog()) }
    }

    /// Engine descriptors per category. Defaults to the built-in table.
    fn fetch_engines(&self) -> impl Future<Output = Result<EngineTable, SearchError>> + Send {
        async { Ok(builtin_engines()) }
    }

    /// Whether server-declared pagination flags are trusted.
    fn pagination_mode(&self) -> PaginationMode {
        PaginationMode::Server
    }

    /// Results per page this backend requests.
    fn per_page(&self) -> u32;
}
