//! Filter selection, the filter-editing draft, and the reset policy.

use serde::{Deserialize, Serialize};
use sift_client::{Catalog, Category, EngineDescriptor};

/// A committed category/engine filter.
///
/// `category: None` is a general search. Engines behave as a set that keeps
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub category: Option<Category>,
    pub engines: Vec<String>,
}

impl FilterSelection {
    /// Build a selection, trimming engine names and dropping blanks and
    /// duplicates.
    pub fn new<I, S>(category: Option<Category>, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            engines: normalize_engines(engines),
        }
    }

    /// No category and no engines.
    pub fn general() -> Self {
        Self::default()
    }

    pub fn is_general(&self) -> bool {
        self.category.is_none() && self.engines.is_empty()
    }
}

pub(crate) fn normalize_engines<I, S>(engines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for engine in engines {
        let engine = engine.into().trim().to_owned();
        if !engine.is_empty() && !out.contains(&engine) {
            out.push(engine);
        }
    }
    out
}

/// What clearing or removing a filter does to the active search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterResetPolicy {
    /// Fall back to a general search and reset the query, results and page
    /// without issuing a request.
    #[default]
    ResetToGeneral,
    /// Fall back to a fixed category and re-run the active query, if any.
    DefaultCategory(Category),
}

impl FilterResetPolicy {
    /// Category a cleared filter falls back to.
    pub fn fallback_category(&self) -> Option<Category> {
        match self {
            Self::ResetToGeneral => None,
            Self::DefaultCategory(category) => Some(*category),
        }
    }
}

/// Uncommitted filter edits, as held by a filter-editing UI.
///
/// A draft starts from the committed selection, is edited freely, and is
/// turned back into a [`FilterSelection`] by [`FilterDraft::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDraft {
    category: Option<Category>,
    engines: Vec<String>,
}

impl FilterDraft {
    pub fn from_selection(selection: &FilterSelection) -> Self {
        Self {
            category: selection.category,
            engines: selection.engines.clone(),
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn engines(&self) -> &[String] {
        &self.engines
    }

    /// Switch category. Engines belong to a category, so switching clears them.
    pub fn select_category(&mut self, category: Option<Category>) {
        if self.category != category {
            self.category = category;
            self.engines.clear();
        }
    }

    /// Add `engine` if absent, remove it if present.
    pub fn toggle_engine(&mut self, engine: &str) {
        let engine = engine.trim();
        if engine.is_empty() {
            return;
        }
        if let Some(pos) = self.engines.iter().position(|e| e == engine) {
            self.engines.remove(pos);
        } else {
            self.engines.push(engine.to_owned());
        }
    }

    pub fn is_engine_selected(&self, engine: &str) -> bool {
        self.engines.iter().any(|e| e == engine)
    }

    /// Whether the draft differs from `fallback` with no engines selected.
    pub fn has_active_filters(&self, fallback: Option<Category>) -> bool {
        self.category != fallback || !self.engines.is_empty()
    }

    /// Discard edits, back to `fallback` with no engines.
    pub fn reset(&mut self, fallback: Option<Category>) {
        self.category = fallback;
        self.engines.clear();
    }

    /// Engines the catalog offers for the draft's category.
    pub fn available_engines<'a>(&self, catalog: &'a Catalog) -> &'a [EngineDescriptor] {
        self.category
            .and_then(|category| catalog.get(&category))
            .map(|info| info.engines.as_slice())
            .unwrap_or(&[])
    }

    pub fn commit(&self) -> FilterSelection {
        FilterSelection::new(self.category, self.engines.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_client::builtin_catalog;

    #[test]
    fn selection_normalizes_engines() {
        let selection = FilterSelection::new(
            Some(Category::Books),
            [" openlibrary ", "", "openlibrary", "annas archive"],
        );
        assert_eq!(selection.engines, vec!["openlibrary", "annas archive"]);
        assert!(!selection.is_general());
        assert!(FilterSelection::general().is_general());
    }

    #[test]
    fn switching_category_clears_engines() {
        let mut draft = FilterDraft::from_selection(&FilterSelection::new(
            Some(Category::Books),
            ["openlibrary"],
        ));
        draft.select_category(Some(Category::Books));
        assert_eq!(draft.engines(), ["openlibrary"]);

        draft.select_category(Some(Category::Science));
        assert_eq!(draft.category(), Some(Category::Science));
        assert!(draft.engines().is_empty());
    }

    #[test]
    fn toggle_engine_adds_then_removes() {
        let mut draft = FilterDraft::default();
        draft.toggle_engine("arxiv");
        draft.toggle_engine("google scholar");
        assert!(draft.is_engine_selected("arxiv"));
        draft.toggle_engine("arxiv");
        assert!(!draft.is_engine_selected("arxiv"));
        assert_eq!(draft.engines(), ["google scholar"]);
        draft.toggle_engine("  ");
        assert_eq!(draft.engines().len(), 1);
    }

    #[test]
    fn active_filters_relative_to_fallback() {
        let mut draft = FilterDraft::default();
        assert!(!draft.has_active_filters(None));
        assert!(draft.has_active_filters(Some(Category::News)));

        draft.reset(Some(Category::News));
        assert!(!draft.has_active_filters(Some(Category::News)));
        draft.toggle_engine("duckduckgo news");
        assert!(draft.has_active_filters(Some(Category::News)));
    }

    #[test]
    fn available_engines_follow_category() {
        let catalog = builtin_catalog();
        let mut draft = FilterDraft::default();
        assert!(draft.available_engines(&catalog).is_empty());
        draft.select_category(Some(Category::Science));
        let names: Vec<&str> = draft
            .available_engines(&catalog)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["arxiv", "google scholar"]);
    }

    #[test]
    fn commit_produces_selection() {
        let mut draft = FilterDraft::default();
        draft.select_category(Some(Category::Books));
        draft.toggle_engine("openlibrary");
        assert_eq!(
            draft.commit(),
            FilterSelection::new(Some(Category::Books), ["openlibrary"])
        );
    }

    #[test]
    fn reset_policy_fallbacks() {
        assert_eq!(FilterResetPolicy::ResetToGeneral.fallback_category(), None);
        assert_eq!(
            FilterResetPolicy::DefaultCategory(Category::News).fallback_category(),
            Some(Category::News)
        );
        assert_eq!(FilterResetPolicy::default(), FilterResetPolicy::ResetToGeneral);
    }

    #[test]
    fn reset_policy_serde_shapes() {
        let general: FilterResetPolicy =
            serde_json::from_str(r#""reset_to_general""#).expect("deserialize");
        assert_eq!(general, FilterResetPolicy::ResetToGeneral);
        let news: FilterResetPolicy =
            serde_json::from_str(r#"{"default_category":"news"}"#).expect("deserialize");
        assert_eq!(news, FilterResetPolicy::DefaultCategory(Category::News));
    }
}
