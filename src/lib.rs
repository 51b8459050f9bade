//! Sift: a search front end over a remote search service.
//!
//! The crate splits into a few independent pieces:
//!
//! - **Controller**: the query/filter/page state machine, written against
//!   the [`sift_client::SearchBackend`] seam
//! - **Config**: TOML configuration with environment overrides
//! - **Host bridge**: newline-delimited JSON commands in, responses and
//!   `state.changed` events out, for native shells driving the controller
//!
//! The HTTP client and wire types live in the `sift-client` crate and are
//! re-exported here.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;

pub use config::{LogConfig, SiftConfig};
pub use controller::{
    ActionOutcome, ControllerConfig, FilterDraft, FilterResetPolicy, FilterSelection, PageSlot,
    PageWindow, Phase, ResultRange, SearchController, SearchState,
};
pub use error::{Result, SiftError};
pub use sift_client::{
    Category, ClientConfig, PaginationMode, ResultItem, SearchBackend, SearchClient,
    SearchError,
};
