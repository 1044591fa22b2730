//! In-memory search over the glossary.
//!
//! The index is a flat `Vec<SearchRecord>` built once per build (or per cache
//! refresh in `serve`) and never mutated afterwards. Every query-side
//! operation borrows it read-only, so concurrent callers can share one
//! snapshot through an `Arc` without locking.
//!
//! ```text
//! ContentEntry ──build_index──▶ SearchRecord ──┬─ search    → Vec<SearchResult>
//!  (markup::strip_markup on body)              ├─ suggest   → Vec<String>
//!                                              ├─ filter_by_category
//!                                              └─ highlight (on display strings)
//! ```
//!
//! None of these functions return errors. Empty indexes, empty queries, and
//! entries with empty fields all produce empty or neutral results.

pub mod filter;
pub mod highlight;
pub mod index;
pub mod markup;
pub mod query;
pub mod suggest;

use serde::{Deserialize, Serialize};

pub use filter::{ALL_CATEGORIES, categories, filter_by_category};
pub use highlight::{
    MARK_CLOSE, MARK_OPEN, escape_html, highlight, highlight_html, highlight_with,
};
pub use index::build_index;
pub use query::{
    CATEGORY_WEIGHT, CONTENT_WEIGHT, DESCRIPTION_WEIGHT, TAG_WEIGHT, TITLE_WEIGHT, search,
};
pub use suggest::{DEFAULT_SUGGESTION_LIMIT, MIN_SUGGESTION_QUERY_CHARS, suggest};

/// One searchable term, derived from a [`ContentEntry`](crate::types::ContentEntry).
///
/// This is the element type of `api/search-index.json`; field names are the
/// client-side contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Same as `slug`.
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    /// Body with markup removed and line breaks collapsed.
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A matched record and its additive field score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult<'a> {
    #[serde(rename = "item")]
    pub record: &'a SearchRecord,
    pub score: u32,
}

/// Query modifiers applied around [`search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Restrict to one category (exact match). `None`, `""` and `"all"` mean
    /// every category.
    pub category: Option<String>,
    /// Maximum number of results. `None` returns all matches.
    pub limit: Option<usize>,
}

/// Filter by category, rank, then truncate.
pub fn run<'a>(index: &'a [SearchRecord], query: &str, options: &SearchOptions) -> Vec<SearchResult<'a>> {
    let category = options.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let scoped = filter_by_category(index, category);
    let mut results = search(scoped, query);
    if let Some(limit) = options.limit {
        results.truncate(limit);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_index;

    #[test]
    fn run_without_options_matches_search() {
        let index = sample_index();
        let via_run = run(&index, "data", &SearchOptions::default());
        let direct = search(&index, "data");
        assert_eq!(via_run, direct);
    }

    #[test]
    fn run_applies_category_before_ranking() {
        let index = sample_index();
        let options = SearchOptions {
            category: Some("Data Format".to_string()),
            limit: None,
        };
        let results = run(&index, "a", &options);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.record.category == "Data Format"));
    }

    #[test]
    fn run_truncates_to_limit() {
        let index = sample_index();
        let options = SearchOptions {
            category: None,
            limit: Some(1),
        };
        let results = run(&index, "a", &options);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn run_with_all_category_is_unfiltered() {
        let index = sample_index();
        let options = SearchOptions {
            category: Some(ALL_CATEGORIES.to_string()),
            limit: None,
        };
        assert_eq!(
            run(&index, "a", &options),
            run(&index, "a", &SearchOptions::default())
        );
    }

    #[test]
    fn search_result_serializes_record_as_item() {
        let index = sample_index();
        let results = search(&index, "JSON");
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["item"]["slug"], "json");
        assert!(json["score"].as_u64().unwrap() >= 10);
    }

    #[test]
    fn record_serializes_with_client_field_names() {
        let index = sample_index();
        let json = serde_json::to_value(&index[0]).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        for key in ["id", "title", "slug", "category", "description", "content", "tags"] {
            assert!(keys.contains(&key.to_string()), "missing {key}");
        }
        assert_eq!(keys.len(), 7);
    }
}
