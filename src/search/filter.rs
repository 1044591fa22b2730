//! Category facet.
//!
//! Categories are a controlled vocabulary, so filtering is an exact,
//! case-sensitive comparison, unlike the substring matching in
//! [`search`](super::search).

use super::SearchRecord;

/// Category value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Records whose category equals `category`.
///
/// `""` and [`ALL_CATEGORIES`] return every record.
pub fn filter_by_category<'a, I>(records: I, category: &str) -> Vec<&'a SearchRecord>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    let records = records.into_iter();
    if category.is_empty() || category == ALL_CATEGORIES {
        return records.collect();
    }
    records.filter(|r| r.category == category).collect()
}

/// Distinct categories in first-seen order.
pub fn categories<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    let mut seen: Vec<&'a str> = Vec::new();
    for record in records {
        if !seen.contains(&record.category.as_str()) {
            seen.push(&record.category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_index;

    #[test]
    fn all_and_empty_return_everything() {
        let index = sample_index();
        let everything: Vec<&SearchRecord> = index.iter().collect();
        assert_eq!(filter_by_category(&index, ALL_CATEGORIES), everything);
        assert_eq!(filter_by_category(&index, ""), everything);
    }

    #[test]
    fn exact_category_match() {
        let index = sample_index();
        let filtered = filter_by_category(&index, "Data Format");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].slug, "json");
    }

    #[test]
    fn match_is_case_sensitive() {
        let index = sample_index();
        assert!(filter_by_category(&index, "data format").is_empty());
    }

    #[test]
    fn unknown_category_is_empty() {
        let index = sample_index();
        assert!(filter_by_category(&index, "Databases").is_empty());
    }

    #[test]
    fn empty_index() {
        let empty: Vec<SearchRecord> = Vec::new();
        assert!(filter_by_category(&empty, "x").is_empty());
    }

    #[test]
    fn categories_in_first_seen_order() {
        let index = sample_index();
        assert_eq!(categories(&index), vec!["Web Development", "Data Format"]);
    }
}
