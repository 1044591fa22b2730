//! Type-ahead suggestions.
//!
//! Candidates are titles, categories and tags that contain the query,
//! collected record by record (title, then category, then tags) and
//! deduplicated in first-seen order.

use std::collections::HashSet;

use super::SearchRecord;

/// Queries shorter than this (in characters, untrimmed) get no suggestions.
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Suggestions returned when the caller does not ask for a specific count.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Up to `limit` distinct display strings containing `query`.
pub fn suggest<'a, I>(records: I, query: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    if limit == 0
        || query.trim().is_empty()
        || query.chars().count() < MIN_SUGGESTION_QUERY_CHARS
    {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let matches = |candidate: &str| candidate.to_lowercase().contains(&needle);

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    for record in records {
        let candidates = std::iter::once(&record.title)
            .chain(std::iter::once(&record.category))
            .chain(record.tags.iter());
        for candidate in candidates {
            if matches(candidate) && seen.insert(candidate.as_str()) {
                suggestions.push(candidate.clone());
                if suggestions.len() == limit {
                    return suggestions;
                }
            }
        }
    }
    suggestions
}
