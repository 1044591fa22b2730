//! Shared types used across all pipeline stages.
//!
//! A [`ContentEntry`] is produced once by [`scan`](crate::scan) and then read
//! by every later stage: validation, index building, related-term resolution,
//! SEO artifacts, and page rendering. Nothing downstream mutates it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One glossary term, normalized from a markdown file and its front matter.
///
/// The slug is unique within a corpus and stable across builds; it is the
/// term's URL segment (`/glossary/{slug}/`) and its search record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Slugs of related terms, in display order. May name slugs that do not
    /// exist; the validator reports those, renderers drop them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    /// Raw markdown body (front matter removed).
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
    /// Source file relative to the content root, for diagnostics.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_path: String,
}

impl ContentEntry {
    /// Site-relative URL path of this term's page.
    pub fn url_path(&self) -> String {
        format!("/glossary/{}/", self.slug)
    }
}
