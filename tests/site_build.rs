//! End-to-end build: content tree → scan → validate → generate → artifacts.

use chrono::{TimeZone, Utc};
use std::fs;
use std::path::Path;
use techgloss::search::{SearchRecord, build_index, search};
use techgloss::validate::{IssueKind, validate};
use techgloss::{generate, scan};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn term(title: &str, category: &str, related: &[&str], date: &str, body: &str) -> String {
    let related: Vec<String> = related.iter().map(|r| format!("\"{r}\"")).collect();
    format!(
        "+++\ntitle = \"{title}\"\ndescription = \"What {title} means\"\ncategory = \"{category}\"\n\
         tags = [\"{}\"]\nrelated = [{}]\nlast_updated = {date}\n+++\n{body}\n",
        title.to_lowercase(),
        related.join(", ")
    )
}

/// A three-term glossary with config and one asset.
fn content_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "config.toml",
        "[site]\nname = \"Example Glossary\"\nurl = \"https://example.dev\"\n\n[feed]\nmax_items = 2\n",
    );
    write(root, "assets/favicon.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
    write(
        root,
        "glossary/cache.md",
        &term(
            "Cache",
            "Performance",
            &["cdn"],
            "2024-01-10",
            "A **cache** stores results. See [CDN](/glossary/cdn/).\n\n```rust\nlet hit = cache.get(&key);\n```",
        ),
    );
    write(
        root,
        "glossary/cdn.md",
        &term("CDN", "Performance", &["cache"], "2024-02-10", "Content delivery network."),
    );
    write(
        root,
        "glossary/web/http.md",
        &term("HTTP", "Networking", &[], "2023-12-01", "# HTTP\n\nThe protocol of the web."),
    );
    tmp
}

#[test]
fn build_writes_complete_site() {
    let content = content_tree();
    let out = TempDir::new().unwrap();

    let corpus = scan::scan(content.path()).unwrap();
    assert_eq!(corpus.config.site.name, "Example Glossary");
    let report = validate(&corpus.entries);
    assert!(report.is_valid(), "unexpected issues: {:?}", report.issues().collect::<Vec<_>>());

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let result = generate::generate(&corpus, content.path(), out.path(), now).unwrap();
    assert_eq!(result.term_pages, 3);
    assert_eq!(result.category_pages, 2);
    assert_eq!(result.assets_copied, 1);

    let read = |rel: &str| {
        fs::read_to_string(out.path().join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
    };

    // Search index
    let records: Vec<SearchRecord> = serde_json::from_str(&read("api/search-index.json")).unwrap();
    let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["cache", "cdn", "http"]);
    assert!(records.iter().all(|r| r.id == r.slug));
    let cache = &records[0];
    assert_eq!(cache.content, "A cache stores results. See CDN.");
    let http = &records[2];
    assert_eq!(http.content, "HTTP The protocol of the web.");

    // Term pages
    let cache_page = read("glossary/cache/index.html");
    assert!(cache_page.contains("<h1>Cache</h1>"));
    assert!(cache_page.contains("Related terms"));
    assert!(cache_page.contains("href=\"/glossary/cdn/\""));
    assert!(cache_page.contains("href=\"https://example.dev/glossary/cache/\""));
    let http_page = read("glossary/http/index.html");
    assert!(http_page.contains("Suggested terms"), "no related list falls back to other terms");

    // Category pages
    let performance = read("category/performance/index.html");
    assert!(performance.contains("Cache") && performance.contains("CDN"));
    assert!(!performance.contains("HTTP"));

    // SEO artifacts
    let sitemap = read("sitemap.xml");
    assert!(sitemap.contains("<loc>https://example.dev/glossary/http/</loc>"));
    assert!(sitemap.contains("<loc>https://example.dev/category/networking/</loc>"));
    let rss = read("rss.xml");
    assert_eq!(rss.matches("<item>").count(), 2);
    assert!(read("robots.txt").contains("Sitemap: https://example.dev/sitemap.xml"));
    let manifest: serde_json::Value = serde_json::from_str(&read("manifest.webmanifest")).unwrap();
    assert_eq!(manifest["short_name"], "Example Glossary");
    let index = read("sitemap-index.xml");
    assert!(index.contains("<loc>https://example.dev/sitemap-news.xml</loc>"));
    // nothing was updated in the 30 days before the build
    assert!(!read("sitemap-news.xml").contains("<url>"));
    assert!(read(".well-known/security.txt")
        .contains("Canonical: https://example.dev/.well-known/security.txt"));
    assert!(read("humans.txt").contains("Last update: 2024-06-01"));
    assert!(cache_page.contains("<meta name=\"keywords\" content=\"Cache, Performance, cache, Example Glossary\">"));

    // Static files
    assert!(out.path().join("favicon.svg").exists());
    assert!(read("site.js").contains("/api/search-index.json"));
    assert!(read("search/index.html").contains("id=\"search-input\""));
    assert!(out.path().join("404.html").exists());
}

#[test]
fn broken_related_term_blocks_build() {
    let content = content_tree();
    write(
        content.path(),
        "glossary/cdn.md",
        &term("CDN", "Performance", &["cachee"], "2024-02-10", "Content delivery network."),
    );

    let corpus = scan::scan(content.path()).unwrap();
    let report = validate(&corpus.entries);
    assert!(!report.is_valid());

    let issue = report.errors().next().unwrap();
    assert_eq!(issue.kind, IssueKind::InvalidRelatedTerm);
    assert_eq!(issue.entry, "cdn");
    assert_eq!(issue.suggestions, vec!["cache"]);
}

#[test]
fn search_over_scanned_corpus() {
    let content = content_tree();
    let corpus = scan::scan(content.path()).unwrap();
    let index = build_index(&corpus.entries);

    let results = search(&index, "cache");
    assert_eq!(results[0].record.slug, "cache");
    // cdn names cache only in `related`, which is not indexed
    assert!(results.iter().all(|r| r.record.slug != "cdn"));

    let results = search(&index, "performance");
    let slugs: Vec<&str> = results.iter().map(|r| r.record.slug.as_str()).collect();
    assert_eq!(slugs, vec!["cache", "cdn"]);
}
