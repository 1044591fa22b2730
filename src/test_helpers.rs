//! Shared test utilities for the techgloss test suite.
//!
//! Provides entry builders, the two-term sample corpus used across the search
//! tests, and fixture setup for tests that scan a real content directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let index = sample_index();
//! let results = search(&index, "javascript");
//! assert_eq!(results[0].record.slug, "json");
//!
//! let tmp = setup_fixtures();
//! let corpus = scan(tmp.path()).unwrap();
//! let api = find_entry(&corpus.entries, "api");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::search::{SearchRecord, build_index};
use crate::types::ContentEntry;

// =========================================================================
// Entry builders
// =========================================================================

/// A complete, valid entry with a one-line body and no tags or related terms.
pub fn entry(slug: &str, title: &str, category: &str) -> ContentEntry {
    ContentEntry {
        slug: slug.to_string(),
        title: title.to_string(),
        description: format!("Definition of {title}"),
        category: category.to_string(),
        tags: Vec::new(),
        related: Vec::new(),
        body: format!("{title} explained."),
        last_updated: None,
        source_path: format!("glossary/{slug}.md"),
    }
}

/// The API/JSON corpus.
pub fn sample_entries() -> Vec<ContentEntry> {
    let mut api = entry("api", "API", "Web Development");
    api.description = "Application Programming Interface".to_string();
    api.tags = vec!["web".to_string(), "backend".to_string()];
    api.body = "An **API** lets programs talk to each other.\n\n```bash\ncurl https://example.com/v1/users\n```\n".to_string();

    let mut json = entry("json", "JSON", "Data Format");
    json.description = "JavaScript Object Notation".to_string();
    json.tags = vec!["data".to_string(), "format".to_string()];
    json.body = "A text format for structured data.\n\n```json\n{\"id\": 1}\n```\n".to_string();

    vec![api, json]
}

/// [`sample_entries`] as a search index.
pub fn sample_index() -> Vec<SearchRecord> {
    build_index(&sample_entries())
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A glossary file with TOML front matter.
pub fn term_file(title: &str, category: &str, body: &str) -> String {
    format!(
        "+++\ntitle = \"{title}\"\ndescription = \"Definition of {title}\"\ncategory = \"{category}\"\n+++\n{body}"
    )
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find an entry by slug. Panics if not found.
pub fn find_entry<'a>(entries: &'a [ContentEntry], slug: &str) -> &'a ContentEntry {
    entries.iter().find(|e| e.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
        panic!("entry '{slug}' not found. Available: {slugs:?}")
    })
}

/// Slugs in corpus order.
pub fn slugs(entries: &[ContentEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.slug.as_str()).collect()
}
