//! Wire types for the remote search API and the values derived from them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named content domain constraining which engines the server queries.
///
/// `None` at the call sites means a general search with no category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    News,
    Books,
    Science,
    SocialMedia,
}

impl Category {
    /// Wire identifier, as sent in request bodies.
    pub fn id(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Books => "books",
            Self::Science => "science",
            Self::SocialMedia => "social_media",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::News => "News",
            Self::Books => "Books",
            Self::Science => "Science",
            Self::SocialMedia => "Social Media",
        }
    }

    /// Returns all categories in display order.
    pub fn all() -> &'static [Category] {
        &[Self::News, Self::Books, Self::Science, Self::SocialMedia]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(Self::News),
            "books" => Ok(Self::Books),
            "science" => Ok(Self::Science),
            "social_media" | "social-media" | "social" => Ok(Self::SocialMedia),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// A single search result as returned by `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Content snippet.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Upstream engine that produced this result.
    #[serde(default, deserialize_with = "null_as_default")]
    pub engine: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
}

/// Body of `POST /search`.
///
/// `category` is omitted for a general search and `engines` is omitted when
/// empty, so the server applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engines: Vec<String>,
}

impl SearchRequest {
    /// Build a general search request for the first page.
    pub fn new(query: impl Into<String>, per_page: u32) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page,
            category: None,
            engines: Vec::new(),
        }
    }

    /// Set the page number (values below 1 are clamped to 1).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Set the engine filter.
    pub fn with_engines(mut self, engines: Vec<String>) -> Self {
        self.engines = engines;
        self
    }
}

/// Successful response of `POST /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ResultItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub number_of_results: u64,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_previous: Option<bool>,
}

impl SearchPage {
    /// Derive the pagination signal for this page under `mode`.
    ///
    /// Server-declared flags are only trusted when the mode allows it and
    /// the server sent `has_next`; otherwise the signal is inferred from
    /// whether this page came back empty. The two are never mixed.
    pub fn pagination(&self, mode: PaginationMode, page: u32) -> PaginationSignal {
        match (mode, self.has_next) {
            (PaginationMode::Server, Some(has_next)) => PaginationSignal::Declared {
                has_next,
                has_previous: self.has_previous.unwrap_or(page > 1),
            },
            _ => PaginationSignal::Inferred {
                exhausted: self.results.is_empty(),
            },
        }
    }
}

/// Which pagination metadata the client relies on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Prefer `has_next`/`has_previous` from the server, inferring only when
    /// a response omits them.
    #[default]
    Server,
    /// Ignore server flags; an empty page means there is no next page.
    Inferred,
}

/// Whether further pages exist, and where that knowledge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PaginationSignal {
    /// Flags reported by the server.
    Declared { has_next: bool, has_previous: bool },
    /// The last fetch came back empty (`exhausted`) or not.
    Inferred { exhausted: bool },
}

impl Default for PaginationSignal {
    fn default() -> Self {
        Self::Inferred { exhausted: false }
    }
}

impl PaginationSignal {
    /// Whether a next page may be requested.
    pub fn has_next(&self) -> bool {
        match *self {
            Self::Declared { has_next, .. } => has_next,
            Self::Inferred { exhausted } => !exhausted,
        }
    }

    /// Whether the empty-page heuristic has fired.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Inferred { exhausted: true })
    }
}

/// An upstream engine the server can query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    pub name: String,
    /// Shortcut used by the upstream metasearch engine, e.g. `ddn`.
    #[serde(default)]
    pub bang: String,
    #[serde(default)]
    pub description: String,
}

impl EngineDescriptor {
    pub fn new(
        name: impl Into<String>,
        bang: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bang: bang.into(),
            description: description.into(),
        }
    }
}

/// Metadata for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub description: String,
    pub engines: Vec<EngineDescriptor>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
