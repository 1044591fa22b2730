//! Weighted substring ranking.
//!
//! A query matches a field when the lowercased query is a substring of the
//! lowercased field. Each matching field adds its weight once:
//!
//! | Field | Weight |
//! |-------|--------|
//! | title | 10 |
//! | description | 5 |
//! | category | 3 |
//! | any tag | 2 |
//! | content | 1 |
//!
//! Body matches count even when the query only appears inside prose the
//! reader would not associate with the term. Ranking stays additive and
//! unconditional.

use super::{SearchRecord, SearchResult};

pub const TITLE_WEIGHT: u32 = 10;
pub const DESCRIPTION_WEIGHT: u32 = 5;
pub const CATEGORY_WEIGHT: u32 = 3;
pub const TAG_WEIGHT: u32 = 2;
pub const CONTENT_WEIGHT: u32 = 1;

/// Rank `records` against `query`.
///
/// An empty or whitespace-only query returns nothing. The query is matched
/// as given (lowercased, not trimmed). Results are sorted by descending score;
/// equal scores keep their input order.
pub fn search<'a, I>(records: I, query: &str) -> Vec<SearchResult<'a>>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut results: Vec<SearchResult<'a>> = records
        .into_iter()
        .filter_map(|record| {
            let score = score(record, &needle);
            (score > 0).then_some(SearchResult { record, score })
        })
        .collect();
    // sort_by is stable
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Additive score of one record. `needle` must already be lowercased.
pub fn score(record: &SearchRecord, needle: &str) -> u32 {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    let mut score = 0;
    if contains(&record.title) {
        score += TITLE_WEIGHT;
    }
    if contains(&record.description) {
        score += DESCRIPTION_WEIGHT;
    }
    if contains(&record.category) {
        score += CATEGORY_WEIGHT;
    }
    if record.tags.iter().any(|tag| contains(tag)) {
        score += TAG_WEIGHT;
    }
    if contains(&record.content) {
        score += CONTENT_WEIGHT;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::build_index;
    use crate::test_helpers::{entry, sample_index};

    fn slugs(results: &[SearchResult<'_>]) -> Vec<String> {
        results.iter().map(|r| r.record.slug.clone()).collect()
    }

    #[test]
    fn empty_and_blank_queries_return_nothing() {
        let index = sample_index();
        assert!(search(&index, "").is_empty());
        assert!(search(&index, "   ").is_empty());
        assert!(search(&index, "\t\n").is_empty());
    }

    #[test]
    fn description_match_finds_json() {
        let index = sample_index();
        let results = search(&index, "javascript");
        assert_eq!(slugs(&results), vec!["json"]);
        assert!(results[0].score > 0);
    }

    #[test]
    fn title_match_scores_at_least_title_weight() {
        let index = sample_index();
        let results = search(&index, "API");
        assert_eq!(results[0].record.slug, "api");
        assert!(results[0].score >= TITLE_WEIGHT);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let index = sample_index();
        assert_eq!(search(&index, "json"), search(&index, "JSON"));
    }

    #[test]
    fn weights_are_additive() {
        let mut e = entry("x", "Cache", "Cache Layer");
        e.description = "A cache".to_string();
        e.tags = vec!["caching".to_string()];
        e.body = "cache body".to_string();
        let index = build_index(&[e]);
        let results = search(&index, "cache");
        assert_eq!(
            results[0].score,
            TITLE_WEIGHT + DESCRIPTION_WEIGHT + CATEGORY_WEIGHT + TAG_WEIGHT + CONTENT_WEIGHT
        );
    }

    #[test]
    fn tag_weight_counted_once() {
        let mut e = entry("x", "Zed", "Misc");
        e.tags = vec!["web".to_string(), "webhooks".to_string()];
        let index = build_index(&[e]);
        assert_eq!(search(&index, "web")[0].score, TAG_WEIGHT);
    }

    #[test]
    fn content_only_match_scores_one() {
        let mut e = entry("x", "Zed", "Misc");
        e.body = "appears in ```ignored``` prose: idempotent".to_string();
        let index = build_index(&[e]);
        assert_eq!(search(&index, "idempotent")[0].score, CONTENT_WEIGHT);
    }

    #[test]
    fn unmatched_records_excluded() {
        let index = sample_index();
        assert!(search(&index, "kubernetes").is_empty());
    }

    #[test]
    fn results_sorted_by_descending_score() {
        let mut a = entry("a", "Other", "Misc");
        a.body = "token".to_string();
        let b = entry("b", "Token", "Misc");
        let mut c = entry("c", "Other", "Misc");
        c.description = "token description".to_string();
        let index = build_index(&[a, b, c]);
        let results = search(&index, "token");
        assert_eq!(slugs(&results), vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_keep_index_order() {
        let index = build_index(&[
            entry("first", "Alpha", "Misc"),
            entry("second", "Alphabet", "Misc"),
            entry("third", "Alpine", "Misc"),
        ]);
        let results = search(&index, "alp");
        assert_eq!(slugs(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn query_is_not_trimmed() {
        let index = build_index(&[entry("a", "Rate limit", "Misc"), entry("b", "Ratelimit", "Misc")]);
        assert_eq!(slugs(&search(&index, "rate ")), vec!["a"]);
    }

    #[test]
    fn empty_index_returns_nothing() {
        let empty: Vec<SearchRecord> = Vec::new();
        assert!(search(&empty, "anything").is_empty());
    }

    #[test]
    fn accepts_filtered_views() {
        let index = sample_index();
        let view: Vec<&SearchRecord> = index.iter().filter(|r| r.slug == "api").collect();
        let results = search(view, "a");
        assert!(results.iter().all(|r| r.record.slug == "api"));
    }
}
