//! Related-term resolution for term pages.
//!
//! An entry's `related` slugs are looked up in the corpus; unknown slugs are
//! dropped here and reported by [`validate`](crate::validate) instead. Entries
//! that list nothing get a few other terms as suggestions so every page has
//! somewhere to go next.

use crate::types::ContentEntry;

/// Number of fallback suggestions for an entry with no `related` list.
pub const FALLBACK_RELATED_LIMIT: usize = 4;

/// What a term page shows in its related-terms section.
#[derive(Debug, Clone, PartialEq)]
pub enum RelatedTerms<'a> {
    /// Terms the author listed, in listed order.
    Explicit(Vec<&'a ContentEntry>),
    /// Other terms offered because the author listed none.
    Suggested(Vec<&'a ContentEntry>),
    /// Nothing to show; the section is omitted.
    None,
}

impl<'a> RelatedTerms<'a> {
    pub fn entries(&self) -> &[&'a ContentEntry] {
        match self {
            RelatedTerms::Explicit(entries) | RelatedTerms::Suggested(entries) => entries,
            RelatedTerms::None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Resolve the related terms of `entry` against `corpus`.
///
/// If `entry.related` is non-empty, only its resolvable slugs are used and no
/// fallback applies, even when none resolve.
pub fn resolve_related<'a>(entry: &ContentEntry, corpus: &'a [ContentEntry]) -> RelatedTerms<'a> {
    if entry.related.is_empty() {
        let suggested: Vec<&ContentEntry> = corpus
            .iter()
            .filter(|other| other.slug != entry.slug)
            .take(FALLBACK_RELATED_LIMIT)
            .collect();
        return if suggested.is_empty() {
            RelatedTerms::None
        } else {
            RelatedTerms::Suggested(suggested)
        };
    }

    let explicit: Vec<&ContentEntry> = entry
        .related
        .iter()
        .filter_map(|slug| corpus.iter().find(|candidate| &candidate.slug == slug))
        .collect();
    if explicit.is_empty() {
        RelatedTerms::None
    } else {
        RelatedTerms::Explicit(explicit)
    }
}

/// Group entries by category, categories in first-seen order.
pub fn grouped_by_category<'a>(entries: &[&'a ContentEntry]) -> Vec<(&'a str, Vec<&'a ContentEntry>)> {
    let mut groups: Vec<(&'a str, Vec<&'a ContentEntry>)> = Vec::new();
    for &entry in entries {
        match groups.iter_mut().find(|(category, _)| *category == entry.category) {
            Some((_, members)) => members.push(entry),
            None => groups.push((&entry.category, vec![entry])),
        }
    }
    groups
}
