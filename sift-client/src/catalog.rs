//! Category and engine metadata.
//!
//! A [`Catalog`] maps each [`Category`] to its display metadata and the
//! engines the server can query for it. The built-in table mirrors the
//! search service's default engine settings; [`crate::SearchClient`] can
//! also fetch the live table from `GET /search/categories` and
//! `GET /search/engines`.

use crate::types::{Category, CategoryInfo, EngineDescriptor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Category metadata keyed by category.
pub type Catalog = BTreeMap<Category, CategoryInfo>;

/// Engine descriptors keyed by category.
pub type EngineTable = BTreeMap<Category, Vec<EngineDescriptor>>;

/// Built-in catalog used when the server's metadata endpoints are not
/// consulted.
pub fn builtin_catalog() -> Catalog {
    Category::all()
        .iter()
        .map(|&category| {
            let (description, engines) = builtin_entry(category);
            (
                category,
                CategoryInfo {
                    name: category.label().to_owned(),
                    description: description.to_owned(),
                    engines,
                },
            )
        })
        .collect()
}

/// Engines of the built-in catalog, keyed by category.
pub fn builtin_engines() -> EngineTable {
    builtin_catalog()
        .into_iter()
        .map(|(category, info)| (category, info.engines))
        .collect()
}

fn builtin_entry(category: Category) -> (&'static str, Vec<EngineDescriptor>) {
    match category {
        Category::News => (
            "Current events and headlines",
            vec![
                EngineDescriptor::new("duckduckgo news", "ddn", "DuckDuckGo News search"),
                EngineDescriptor::new("presearch news", "psn", "Presearch News search"),
            ],
        ),
        Category::Books => (
            "Books and long-form publications",
            vec![
                EngineDescriptor::new("openlibrary", "ol", "Open Library book search"),
                EngineDescriptor::new("annas archive", "aa", "Anna's Archive book search"),
            ],
        ),
        Category::Science => (
            "Scientific papers and academic sources",
            vec![
                EngineDescriptor::new("arxiv", "arxiv", "arXiv scientific papers"),
                EngineDescriptor::new("google scholar", "gos", "Google Scholar academic search"),
            ],
        ),
        Category::SocialMedia => (
            "Community discussions",
            vec![EngineDescriptor::new("reddit", "re", "Reddit search")],
        ),
    }
}

/// Engine names listed for `category` in `catalog`.
pub fn engine_names(catalog: &Catalog, category: Category) -> Vec<&str> {
    catalog
        .get(&category)
        .map(|info| info.engines.iter().map(|e| e.name.as_str()).collect())
        .unwrap_or_default()
}

// ── Wire formats ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesResponse {
    #[serde(default)]
    categories: HashMap<String, WireCategory>,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    engines: Vec<String>,
}

impl CategoriesResponse {
    /// Convert to a [`Catalog`], skipping ids this client does not model.
    pub(crate) fn into_catalog(self) -> Catalog {
        let mut catalog = Catalog::new();
        for (id, wire) in self.categories {
            let Ok(category) = id.parse::<Category>() else {
                tracing::warn!(category = %id, "skipping unknown category from server");
                continue;
            };
            let name = if wire.name.is_empty() {
                category.label().to_owned()
            } else {
                wire.name
            };
            let engines = wire
                .engines
                .into_iter()
                .map(|engine| EngineDescriptor::new(engine, "", ""))
                .collect();
            catalog.insert(
                category,
                CategoryInfo {
                    name,
                    description: wire.description,
                    engines,
                },
            );
        }
        catalog
    }
}

/// Convert the `GET /search/engines` body, skipping unknown category ids.
pub(crate) fn engines_from_wire(raw: HashMap<String, Vec<EngineDescriptor>>) -> EngineTable {
    let mut table = EngineTable::new();
    for (id, engines) in raw {
        match id.parse::<Category>() {
            Ok(category) => {
                table.insert(category, engines);
            }
            Err(_) => tracing::warn!(category = %id, "skipping unknown category from server"),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_covers_every_category() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), Category::all().len());
        for category in Category::all() {
            let info = catalog.get(category).expect("category present");
            assert!(!info.engines.is_empty());
            assert_eq!(info.name, category.label());
        }
    }

    #[test]
    fn builtin_books_engines() {
        let catalog = builtin_catalog();
        assert_eq!(
            engine_names(&catalog, Category::Books),
            vec!["openlibrary", "annas archive"]
        );
        let books = &catalog[&Category::Books];
        assert_eq!(books.engines[0].bang, "ol");
    }

    #[test]
    fn builtin_engines_matches_catalog() {
        let engines = builtin_engines();
        assert_eq!(engines[&Category::SocialMedia].len(), 1);
        assert_eq!(engines[&Category::SocialMedia][0].name, "reddit");
    }

    #[test]
    fn categories_response_skips_unknown_ids() {
        let raw: CategoriesResponse = serde_json::from_value(serde_json::json!({
            "categories": {
                "science": {"name": "Science", "description": "Papers", "engines": ["arxiv"]},
                "images": {"name": "Images", "description": "", "engines": ["bing images"]}
            }
        }))
        .expect("deserialize");
        let catalog = raw.into_catalog();
        assert_eq!(catalog.len(), 1);
        let science = &catalog[&Category::Science];
        assert_eq!(science.description, "Papers");
        assert_eq!(science.engines[0].name, "arxiv");
        assert!(science.engines[0].bang.is_empty());
    }

    #[test]
    fn categories_response_fills_missing_name() {
        let raw: CategoriesResponse = serde_json::from_value(serde_json::json!({
            "categories": {"social_media": {"engines": []}}
        }))
        .expect("deserialize");
        let catalog = raw.into_catalog();
        assert_eq!(catalog[&Category::SocialMedia].name, "Social Media");
    }

    #[test]
    fn engines_from_wire_keeps_known_categories() {
        let mut raw = HashMap::new();
        raw.insert(
            "news".to_owned(),
            vec![EngineDescriptor::new("duckduckgo news", "ddn", "")],
        );
        raw.insert("maps".to_owned(), vec![]);
        let table = engines_from_wire(raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table[&Category::News][0].bang, "ddn");
    }
}
