//! Command routing from host envelopes to [`SearchController`] actions.
//!
//! Query and filter commands are acknowledged immediately with
//! `{"accepted": true}`; the controller action runs on a background task and
//! its effect reaches the frontend as `state.changed` events. Read-only
//! commands (`state.get`, `catalog.*`) answer inline.

use crate::controller::{
    ActionOutcome, FilterSelection, PageSlot, PageWindow, ResultRange, SearchController,
    SearchState,
};
use crate::error::{Result, SiftError};
use crate::host::contract::{
    CommandEnvelope, CommandName, ContractError, EVENT_VERSION, ResponseEnvelope,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sift_client::{Category, SearchBackend};
use tokio::task::JoinSet;

/// State snapshot plus the values a renderer would otherwise derive itself.
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    #[serde(flatten)]
    pub state: SearchState,
    pub has_next: bool,
    pub has_previous: bool,
    pub total_pages: u32,
    pub visible_pages: Vec<PageSlot>,
    pub result_range: ResultRange,
}

impl StateView {
    pub fn new(state: SearchState, window: PageWindow) -> Self {
        Self {
            has_next: state.has_next(),
            has_previous: state.has_previous(),
            total_pages: state.total_pages(),
            visible_pages: state.visible_pages(window),
            result_range: state.result_range(),
            state,
        }
    }
}

/// A parsed controller action.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Submit(String),
    Page(u32),
    Next,
    Previous,
    Retry,
    Apply(FilterSelection),
    Clear,
    RemoveEngine(String),
    RemoveCategory,
}

impl Action {
    async fn run<B: SearchBackend>(self, controller: &SearchController<B>) -> ActionOutcome {
        match self {
            Self::Submit(query) => controller.submit_query(&query).await,
            Self::Page(page) => controller.go_to_page(page).await,
            Self::Next => controller.go_to_next_page().await,
            Self::Previous => controller.go_to_previous_page().await,
            Self::Retry => controller.retry().await,
            Self::Apply(filters) => controller.apply_filters(filters).await,
            Self::Clear => controller.clear_filters().await,
            Self::RemoveEngine(engine) => controller.remove_engine(&engine).await,
            Self::RemoveCategory => controller.remove_category().await,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApplyFiltersPayload {
    category: Option<String>,
    engines: Vec<String>,
}

/// Routes host commands to a controller and tracks the actions it started.
pub struct CommandHandler<B> {
    controller: SearchController<B>,
    tasks: JoinSet<ActionOutcome>,
}

impl<B: SearchBackend + 'static> CommandHandler<B> {
    pub fn new(controller: SearchController<B>) -> Self {
        Self {
            controller,
            tasks: JoinSet::new(),
        }
    }

    pub fn controller(&self) -> &SearchController<B> {
        &self.controller
    }

    /// Current state as a [`StateView`].
    pub fn view(&self) -> StateView {
        StateView::new(
            self.controller.snapshot(),
            self.controller.config().page_window,
        )
    }

    /// Handle one command and build its response. Never fails: routing
    /// errors become error envelopes.
    pub async fn handle(&mut self, envelope: &CommandEnvelope) -> ResponseEnvelope {
        self.reap();
        if let Err(e) = envelope.validate() {
            tracing::warn!(request_id = %envelope.request_id, error = %e, "invalid command envelope");
            return ResponseEnvelope::error(envelope.request_id.clone(), e.to_string());
        }

        match self.route(envelope).await {
            Ok(payload) => ResponseEnvelope::ok(envelope.request_id.clone(), payload),
            Err(e) => {
                tracing::warn!(
                    request_id = %envelope.request_id,
                    command = envelope.command.as_str(),
                    error = %e,
                    "host command failed"
                );
                ResponseEnvelope::error(envelope.request_id.clone(), e.to_string())
            }
        }
    }

    /// Wait for every started action to finish.
    pub async fn drain(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            log_outcome(joined);
        }
    }

    async fn route(&mut self, envelope: &CommandEnvelope) -> Result<serde_json::Value> {
        match envelope.command {
            command if command.is_action() => self.start_action(command, &envelope.payload),
            CommandName::HostPing => Ok(json!({"pong": true})),
            CommandName::HostVersion => Ok(json!({
                "contract_version": EVENT_VERSION,
                "package_version": env!("CARGO_PKG_VERSION"),
            })),
            CommandName::HostStop => Ok(json!({"stopping": true})),
            CommandName::StateGet => Ok(serde_json::to_value(self.view())?),
            CommandName::CatalogCategories => {
                let catalog = self.controller.categories().await?;
                Ok(json!({"categories": catalog}))
            }
            CommandName::CatalogEngines => {
                let engines = self.controller.engines().await?;
                Ok(serde_json::to_value(engines)?)
            }
            command => Err(SiftError::Bridge(format!(
                "{} has no handler",
                command.as_str()
            ))),
        }
    }

    /// Parse and spawn a controller action, answering `{"accepted": true}`.
    fn start_action(
        &mut self,
        command: CommandName,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let action = parse_action(command, payload).map_err(|e| SiftError::Bridge(e.message))?;
        tracing::debug!(command = command.as_str(), ?action, "starting action");
        let controller = self.controller.clone();
        self.tasks
            .spawn(async move { action.run(&controller).await });
        Ok(json!({"accepted": true}))
    }

    /// Collect actions that already finished.
    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            log_outcome(joined);
        }
    }
}

fn log_outcome(joined: std::result::Result<ActionOutcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => tracing::debug!(?outcome, "action finished"),
        Err(e) => tracing::error!(error = %e, "action task failed"),
    }
}

fn parse_action(
    command: CommandName,
    payload: &serde_json::Value,
) -> std::result::Result<Action, ContractError> {
    match command {
        CommandName::SearchSubmit => parse_query(payload).map(Action::Submit),
        CommandName::SearchPage => parse_page(payload).map(Action::Page),
        CommandName::SearchNext => Ok(Action::Next),
        CommandName::SearchPrevious => Ok(Action::Previous),
        CommandName::SearchRetry => Ok(Action::Retry),
        CommandName::FiltersApply => parse_filters(payload).map(Action::Apply),
        CommandName::FiltersClear => Ok(Action::Clear),
        CommandName::FiltersRemoveEngine => parse_engine(payload).map(Action::RemoveEngine),
        CommandName::FiltersRemoveCategory => Ok(Action::RemoveCategory),
        other => Err(ContractError::payload(format!(
            "{} is not a controller action",
            other.as_str()
        ))),
    }
}

fn parse_query(payload: &serde_json::Value) -> std::result::Result<String, ContractError> {
    payload
        .get("query")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ContractError::payload("search.submit requires payload.query"))
}

fn parse_page(payload: &serde_json::Value) -> std::result::Result<u32, ContractError> {
    payload
        .get("page")
        .and_then(serde_json::Value::as_u64)
        .filter(|page| *page >= 1)
        .and_then(|page| u32::try_from(page).ok())
        .ok_or_else(|| {
            ContractError::payload("search.page requires payload.page (positive integer)")
        })
}

fn parse_filters(payload: &serde_json::Value) -> std::result::Result<FilterSelection, ContractError> {
    let raw: ApplyFiltersPayload = if payload.is_null() {
        ApplyFiltersPayload::default()
    } else {
        serde_json::from_value(payload.clone())
            .map_err(|e| ContractError::payload(format!("invalid filters.apply payload: {e}")))?
    };
    let category = raw
        .category
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.parse::<Category>())
        .transpose()
        .map_err(ContractError::payload)?;
    Ok(FilterSelection::new(category, raw.engines))
}

fn parse_engine(payload: &serde_json::Value) -> std::result::Result<String, ContractError> {
    payload
        .get("engine")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ContractError::payload("filters.remove_engine requires payload.engine"))
}
