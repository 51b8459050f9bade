//! # sift-client
//!
//! Typed HTTP client for the sift remote search API.
//!
//! The search engine itself is an external service; this crate only knows
//! how to talk to it:
//!
//! - `POST /search` with a query, page and optional category/engine filters
//! - `GET /search/categories` and `GET /search/engines` for filter metadata
//!
//! ## Design
//!
//! - One attempt per call: no retry, no caching
//! - A per-request timeout from [`ClientConfig`] surfaces as [`SearchError::Timeout`]
//! - Non-2xx answers carry the server's `detail` message in [`SearchError::Api`]
//! - The [`SearchBackend`] trait is the seam the controller is written against
//!
//! ## Security
//!
//! - Query text is logged only at trace level
//! - Error messages never include the query

pub mod backend;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use backend::SearchBackend;
pub use catalog::{builtin_catalog, Catalog, EngineTable};
pub use client::SearchClient;
pub use config::ClientConfig;
pub use error::{Result, SearchError};
pub use types::{
    Category, CategoryInfo, EngineDescriptor, PaginationMode, PaginationSignal, ResultItem,
    SearchPage, SearchRequest,
};
