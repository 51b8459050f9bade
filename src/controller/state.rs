//! The observable search state and its settle transitions.

use super::filters::FilterSelection;
use super::pagination::{self, PageSlot, PageWindow, ResultRange};
use serde::Serialize;
use sift_client::{
    Category, PaginationMode, PaginationSignal, ResultItem, SearchError, SearchPage,
};

/// Where the controller is in its request cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No query has been issued yet, or the search was reset.
    #[default]
    Idle,
    /// A request is outstanding.
    Searching,
    /// The latest request succeeded.
    Settled,
    /// The latest request failed; see [`SearchState::error`].
    Failed,
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    pub results: Vec<ResultItem>,
    /// `None` until a search has settled successfully.
    pub total_results: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
    pub category: Option<Category>,
    pub engines: Vec<String>,
    pub pagination: PaginationSignal,
    pub phase: Phase,
    /// Set on each successful settle to the id of the request whose results
    /// are shown. Renderers restore scroll position after applying a
    /// snapshot whose anchor changed.
    pub scroll_anchor: Option<u64>,
}

impl SearchState {
    pub fn new(per_page: u32, category: Option<Category>) -> Self {
        Self {
            query: String::new(),
            page: 1,
            per_page,
            results: Vec::new(),
            total_results: None,
            loading: false,
            error: None,
            category,
            engines: Vec::new(),
            pagination: PaginationSignal::default(),
            phase: Phase::Idle,
            scroll_anchor: None,
        }
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    /// Whether "next page" is enabled.
    pub fn has_next(&self) -> bool {
        self.has_query() && self.pagination.has_next()
    }

    /// Whether "previous page" is enabled.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether the last fetch came back empty.
    pub fn is_exhausted(&self) -> bool {
        self.pagination.is_exhausted()
    }

    /// The committed filters.
    pub fn filters(&self) -> FilterSelection {
        FilterSelection {
            category: self.category,
            engines: self.engines.clone(),
        }
    }

    /// Pages implied by `total_results`; the current page while unknown.
    pub fn total_pages(&self) -> u32 {
        match self.total_results {
            Some(total) => pagination::total_pages(total, self.per_page),
            None => self.page,
        }
    }

    pub fn visible_pages(&self, window: PageWindow) -> Vec<PageSlot> {
        pagination::visible_pages(window, self.page, self.total_pages())
    }

    pub fn result_range(&self) -> ResultRange {
        pagination::result_range(
            self.page,
            self.per_page,
            self.total_results,
            self.results.len(),
        )
    }

    /// Enter [`Phase::Searching`] for `page`. Results stay visible until
    /// the request settles.
    pub(crate) fn begin(&mut self, page: u32) {
        self.page = page;
        self.loading = true;
        self.error = None;
        self.phase = Phase::Searching;
    }

    /// Apply a successful response issued as request `request_id`.
    pub(crate) fn settle_success(&mut self, page: SearchPage, mode: PaginationMode, request_id: u64) {
        self.pagination = page.pagination(mode, self.page);
        self.total_results = Some(page.number_of_results);
        self.results = page.results;
        self.loading = false;
        self.error = None;
        self.phase = Phase::Settled;
        self.scroll_anchor = Some(request_id);
    }

    /// Apply a failure. Results are cleared so an error is never shown next
    /// to stale results.
    pub(crate) fn settle_failure(&mut self, err: &SearchError) {
        self.results.clear();
        self.total_results = None;
        self.loading = false;
        self.error = Some(err.user_message());
        self.phase = Phase::Failed;
    }

    /// Drop the query and everything derived from it. Filters are kept.
    pub(crate) fn reset_search(&mut self) {
        self.query.clear();
        self.page = 1;
        self.results.clear();
        self.total_results = None;
        self.loading = false;
        self.error = None;
        self.pagination = PaginationSignal::default();
        self.phase = Phase::Idle;
        self.scroll_anchor = None;
    }
}
