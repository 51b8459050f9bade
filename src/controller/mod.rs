//! Search controller: the query/filter/page state machine.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  submit   ┌───────────┐  ok    ┌─────────┐
//! │ Idle ├──────────►│ Searching ├───────►│ Settled │
//! └──▲───┘           └─▲───┬─────┘        └────┬────┘
//!    │ reset           │   │ error             │ page / filters / retry
//!    │                 │   ▼                   │
//!    │                 │ ┌────────┐            │
//!    └─────────────────┴─┤ Failed │◄───────────┘
//!                        └────────┘
//! ```
//!
//! Every action that issues a request takes a fresh request id. A response
//! is applied only if its id is still the latest, so a slow early response
//! can never overwrite a newer one. Reset actions also advance the id,
//! which discards anything still in flight.
//!
//! State lives behind a [`std::sync::Mutex`] that is never held across an
//! `.await`; each change is published to subscribers through a
//! [`tokio::sync::watch`] channel.

pub mod filters;
pub mod pagination;
pub mod state;

pub use filters::{FilterDraft, FilterResetPolicy, FilterSelection};
pub use pagination::{PageSlot, PageWindow, ResultRange};
pub use state::{Phase, SearchState};

use filters::normalize_engines;
use serde::{Deserialize, Serialize};
use sift_client::{Catalog, EngineTable, SearchBackend, SearchError, SearchRequest};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Controller behaviour that is a product decision rather than a fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Pagination window renderers are told to show.
    pub page_window: PageWindow,
    /// What clearing or removing filters does.
    pub filter_reset: FilterResetPolicy,
}

/// What an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Preconditions not met; nothing changed and no request was sent.
    Ignored,
    /// State changed without a request.
    Updated,
    /// A request was sent and its results applied.
    Settled,
    /// A request was sent and its failure recorded in the error slot.
    Failed,
    /// A request was sent but a newer action superseded it; its response
    /// was discarded.
    Superseded,
}

struct Session {
    state: SearchState,
    /// Id of the most recently issued request (or reset).
    latest: u64,
}

struct Inner<B> {
    backend: B,
    config: ControllerConfig,
    session: Mutex<Session>,
    state_tx: watch::Sender<SearchState>,
}

/// A request that has been recorded in state but not yet sent.
struct Ticket {
    id: u64,
    request: SearchRequest,
}

/// Drives a [`SearchBackend`] from user actions.
///
/// Cheap to clone; clones share state. All actions take `&self` and may be
/// called concurrently.
pub struct SearchController<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for SearchController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: SearchBackend> SearchController<B> {
    pub fn new(backend: B, config: ControllerConfig) -> Self {
        let state = SearchState::new(backend.per_page(), config.filter_reset.fallback_category());
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                session: Mutex::new(Session { state, latest: 0 }),
                state_tx,
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Current state.
    pub fn snapshot(&self) -> SearchState {
        self.lock().state.clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state_tx.subscribe()
    }

    /// Start a new search for `text` on page 1 with the current filters.
    ///
    /// Blank input is ignored.
    pub async fn submit_query(&self, text: &str) -> ActionOutcome {
        let query = text.trim();
        if query.is_empty() {
            return ActionOutcome::Ignored;
        }
        let ticket = {
            let mut session = self.lock();
            session.state.query = query.to_owned();
            session.state.pagination = Default::default();
            self.issue(&mut session, 1)
        };
        self.run(ticket).await
    }

    /// Fetch page `page` (clamped to at least 1) of the active query.
    pub async fn go_to_page(&self, page: u32) -> ActionOutcome {
        let page = page.max(1);
        let ticket = {
            let mut session = self.lock();
            if !session.state.has_query() || session.state.page == page {
                return ActionOutcome::Ignored;
            }
            self.issue(&mut session, page)
        };
        self.run(ticket).await
    }

    /// Fetch the next page unless the pagination signal says there is none.
    pub async fn go_to_next_page(&self) -> ActionOutcome {
        let next = {
            let session = self.lock();
            if !session.state.has_next() {
                tracing::debug!(page = session.state.page, "no next page; ignoring");
                return ActionOutcome::Ignored;
            }
            session.state.page.saturating_add(1)
        };
        self.go_to_page(next).await
    }

    pub async fn go_to_previous_page(&self) -> ActionOutcome {
        let previous = {
            let session = self.lock();
            if !session.state.has_previous() {
                return ActionOutcome::Ignored;
            }
            session.state.page - 1
        };
        self.go_to_page(previous).await
    }

    /// Commit `filters`. An active query is re-run from page 1; otherwise the
    /// filters are only stored.
    pub async fn apply_filters(&self, filters: FilterSelection) -> ActionOutcome {
        let ticket = {
            let mut session = self.lock();
            session.state.category = filters.category;
            session.state.engines = normalize_engines(filters.engines);
            session.state.pagination = Default::default();
            if !session.state.has_query() {
                self.publish(&session);
                return ActionOutcome::Updated;
            }
            self.issue(&mut session, 1)
        };
        self.run(ticket).await
    }

    /// Reset category and engines according to the reset policy.
    pub async fn clear_filters(&self) -> ActionOutcome {
        let fallback = self.inner.config.filter_reset.fallback_category();
        self.reset_filters_with(|state| {
            state.category = fallback;
            state.engines.clear();
        })
        .await
    }

    /// Remove one engine from the filter. Unknown engines are ignored.
    pub async fn remove_engine(&self, engine: &str) -> ActionOutcome {
        if !self.lock().state.engines.iter().any(|e| e == engine) {
            return ActionOutcome::Ignored;
        }
        self.reset_filters_with(|state| state.engines.retain(|e| e != engine))
            .await
    }

    /// Drop the category filter (and its engines).
    pub async fn remove_category(&self) -> ActionOutcome {
        self.clear_filters().await
    }

    /// Clear the error and re-run the last search at the last requested page.
    pub async fn retry(&self) -> ActionOutcome {
        let ticket = {
            let mut session = self.lock();
            if !session.state.has_query() {
                return ActionOutcome::Ignored;
            }
            let page = session.state.page;
            self.issue(&mut session, page)
        };
        self.run(ticket).await
    }

    /// Category metadata from the backend.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`SearchError`].
    pub async fn categories(&self) -> Result<Catalog, SearchError> {
        self.inner.backend.fetch_categories().await
    }

    /// Engine descriptors from the backend.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`SearchError`].
    pub async fn engines(&self) -> Result<EngineTable, SearchError> {
        self.inner.backend.fetch_engines().await
    }

    /// Apply `edit` to the filters, then follow the reset policy.
    async fn reset_filters_with(&self, edit: impl FnOnce(&mut SearchState)) -> ActionOutcome {
        let ticket = {
            let mut session = self.lock();
            edit(&mut session.state);
            match self.inner.config.filter_reset {
                FilterResetPolicy::ResetToGeneral => {
                    session.state.reset_search();
                    session.latest += 1;
                    tracing::debug!(request_id = session.latest, "search reset");
                    self.publish(&session);
                    return ActionOutcome::Updated;
                }
                FilterResetPolicy::DefaultCategory(_) => {
                    session.state.pagination = Default::default();
                    if !session.state.has_query() {
                        self.publish(&session);
                        return ActionOutcome::Updated;
                    }
                    self.issue(&mut session, 1)
                }
            }
        };
        self.run(ticket).await
    }

    /// Record a new request for `page` and publish the loading state.
    fn issue(&self, session: &mut Session, page: u32) -> Ticket {
        session.latest += 1;
        session.state.begin(page);
        let state = &session.state;
        let request = SearchRequest::new(state.query.clone(), state.per_page)
            .with_page(page)
            .with_category(state.category)
            .with_engines(state.engines.clone());
        tracing::debug!(
            request_id = session.latest,
            page,
            category = ?state.category,
            engines = state.engines.len(),
            "search issued"
        );
        self.publish(session);
        Ticket {
            id: session.latest,
            request,
        }
    }

    /// Send `ticket` and settle state if it is still the latest request.
    async fn run(&self, ticket: Ticket) -> ActionOutcome {
        let result = self.inner.backend.search(&ticket.request).await;

        let mut session = self.lock();
        if session.latest != ticket.id {
            tracing::debug!(
                request_id = ticket.id,
                latest = session.latest,
                "discarding superseded response"
            );
            return ActionOutcome::Superseded;
        }

        let outcome = match result {
            Ok(page) => {
                tracing::debug!(
                    request_id = ticket.id,
                    results = page.results.len(),
                    "search settled"
                );
                let mode = self.inner.backend.pagination_mode();
                session.state.settle_success(page, mode, ticket.id);
                ActionOutcome::Settled
            }
            Err(err) => {
                tracing::warn!(request_id = ticket.id, error = %err, "search failed");
                session.state.settle_failure(&err);
                ActionOutcome::Failed
            }
        };
        self.publish(&session);
        outcome
    }

    fn publish(&self, session: &Session) {
        self.inner.state_tx.send_replace(session.state.clone());
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
