//! Versioned host command/event envelopes for the search bridge.

use serde::{Deserialize, Serialize};

/// Contract version for host command/event envelopes.
pub const EVENT_VERSION: u32 = 1;

/// Event emitted whenever the controller publishes a new state.
pub const STATE_CHANGED_EVENT: &str = "state.changed";

/// Command set understood by the search bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandName {
    #[serde(rename = "host.ping")]
    HostPing,
    #[serde(rename = "host.version")]
    HostVersion,
    #[serde(rename = "host.stop")]
    HostStop,
    #[serde(rename = "state.get")]
    StateGet,
    #[serde(rename = "search.submit")]
    SearchSubmit,
    #[serde(rename = "search.page")]
    SearchPage,
    #[serde(rename = "search.next")]
    SearchNext,
    #[serde(rename = "search.previous")]
    SearchPrevious,
    #[serde(rename = "search.retry")]
    SearchRetry,
    #[serde(rename = "filters.apply")]
    FiltersApply,
    #[serde(rename = "filters.clear")]
    FiltersClear,
    #[serde(rename = "filters.remove_engine")]
    FiltersRemoveEngine,
    #[serde(rename = "filters.remove_category")]
    FiltersRemoveCategory,
    #[serde(rename = "catalog.categories")]
    CatalogCategories,
    #[serde(rename = "catalog.engines")]
    CatalogEngines,
}

impl CommandName {
    /// Render command name to wire format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HostPing => "host.ping",
            Self::HostVersion => "host.version",
            Self::HostStop => "host.stop",
            Self::StateGet => "state.get",
            Self::SearchSubmit => "search.submit",
            Self::SearchPage => "search.page",
            Self::SearchNext => "search.next",
            Self::SearchPrevious => "search.previous",
            Self::SearchRetry => "search.retry",
            Self::FiltersApply => "filters.apply",
            Self::FiltersClear => "filters.clear",
            Self::FiltersRemoveEngine => "filters.remove_engine",
            Self::FiltersRemoveCategory => "filters.remove_category",
            Self::CatalogCategories => "catalog.categories",
            Self::CatalogEngines => "catalog.engines",
        }
    }

    /// Whether the command starts a controller action that runs after the
    /// response is written.
    #[must_use]
    pub fn is_action(self) -> bool {
        matches!(
            self,
            Self::SearchSubmit
                | Self::SearchPage
                | Self::SearchNext
                | Self::SearchPrevious
                | Self::SearchRetry
                | Self::FiltersApply
                | Self::FiltersClear
                | Self::FiltersRemoveEngine
                | Self::FiltersRemoveCategory
        )
    }
}

/// A versioned response envelope from bridge -> frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub v: u32,
    pub request_id: String,
    pub ok: bool,
    pub payload: serde_json::Value,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Build a successful response envelope.
    #[must_use]
    pub fn ok(request_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            v: EVENT_VERSION,
            request_id: request_id.into(),
            ok: true,
            payload,
            error: None,
        }
    }

    /// Build an error response envelope.
    #[must_use]
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            v: EVENT_VERSION,
            request_id: request_id.into(),
            ok: false,
            payload: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

/// A versioned command envelope from frontend -> bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub v: u32,
    pub request_id: String,
    pub command: CommandName,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandEnvelope {
    /// Build a v1 command envelope.
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        command: CommandName,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            v: EVENT_VERSION,
            request_id: request_id.into(),
            command,
            payload,
        }
    }

    /// Validate envelope version and required identifiers.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.v != EVENT_VERSION {
            return Err(ContractError::new(
                ContractErrorKind::UnsupportedVersion,
                format!(
                    "unsupported contract version {}; expected {}",
                    self.v, EVENT_VERSION
                ),
            ));
        }
        if self.request_id.trim().is_empty() {
            return Err(ContractError::new(
                ContractErrorKind::InvalidEnvelope,
                "request_id cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A versioned event envelope from bridge -> frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub v: u32,
    pub event_id: String,
    pub event: String,
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Build a v1 event envelope with a fresh id.
    #[must_use]
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            v: EVENT_VERSION,
            event_id: uuid::Uuid::new_v4().to_string(),
            event: event.into(),
            payload,
        }
    }
}

/// Contract validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    UnsupportedVersion,
    InvalidEnvelope,
    InvalidPayload,
}

/// Contract validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    pub kind: ContractErrorKind,
    pub message: String,
}

impl ContractError {
    #[must_use]
    pub fn new(kind: ContractErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub(crate) fn payload(message: impl Into<String>) -> Self {
        Self::new(ContractErrorKind::InvalidPayload, message.into())
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ContractError {}
