//! Index construction: one [`SearchRecord`] per [`ContentEntry`].

use super::SearchRecord;
use super::markup::strip_markup;
use crate::types::ContentEntry;

/// Build the search index for a corpus.
///
/// Output order and length match the input; `id` and `slug` are the entry's
/// slug.
pub fn build_index(entries: &[ContentEntry]) -> Vec<SearchRecord> {
    entries.iter().map(record_for).collect()
}

fn record_for(entry: &ContentEntry) -> SearchRecord {
    SearchRecord {
        id: entry.slug.clone(),
        title: entry.title.clone(),
        slug: entry.slug.clone(),
        category: entry.category.clone(),
        description: entry.description.clone(),
        content: strip_markup(&entry.body),
        tags: entry.tags.clone(),
    }
}
