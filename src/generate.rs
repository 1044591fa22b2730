//! HTML site generation.
//!
//! Stage 3 of the techgloss build pipeline. Takes the scanned corpus and
//! writes the complete static site: HTML pages, the search index, SEO files,
//! and static assets.
//!
//! ## Generated Pages
//!
//! - **Home page** (`/index.html`): search form, category navigation, all terms
//! - **Term pages** (`/glossary/{slug}/index.html`): definition, rendered body,
//!   related terms, structured data
//! - **Category pages** (`/category/{category-slug}/index.html`): terms in one category
//! - **Search page** (`/search/index.html`): client-side search over the index
//! - **Not found page** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── glossary/
//! │   └── api/index.html
//! ├── category/
//! │   └── web-development/index.html
//! ├── search/index.html
//! ├── api/search-index.json      # Vec<SearchRecord> as JSON
//! ├── sitemap.xml
//! ├── sitemap-news.xml           # Terms updated in the last 30 days
//! ├── sitemap-index.xml
//! ├── rss.xml
//! ├── robots.txt
//! ├── humans.txt
//! ├── .well-known/security.txt
//! ├── manifest.webmanifest
//! ├── site.js
//! └── logo.svg                   # Copied from content/assets/
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config), inlined
//!   into every page
//! - `static/site.js`: Theme persistence and client-side search, written to
//!   `/site.js`. Its ranking mirrors [`search`](crate::search::search) so the
//!   search page and `techgloss search` agree.
//!
//! ## Parallelism
//!
//! Term pages are independent and rendered with rayon's `par_iter` on the
//! global pool, which the binary sizes from `[processing] max_processes`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Markdown
//! bodies are rendered with pulldown-cmark.

use crate::config::{self, SiteConfig};
use crate::naming::{category_path, slugify};
use crate::related::{RelatedTerms, grouped_by_category, resolve_related};
use crate::scan::{ASSETS_DIR, Corpus};
use crate::search::{SearchRecord, build_index, categories};
use crate::seo;
use crate::types::ContentEntry;
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Site-relative path of the serialized search index.
pub const SEARCH_INDEX_PATH: &str = "api/search-index.json";

/// What a generate run wrote, for CLI output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub term_pages: usize,
    pub category_pages: usize,
    pub index_records: usize,
    pub index_bytes: usize,
    pub assets_copied: usize,
}

/// A category page: URL slug, display label (first seen), member terms.
struct CategoryGroup<'a> {
    slug: String,
    label: &'a str,
    entries: Vec<&'a ContentEntry>,
}

/// Shared rendering context.
struct Site<'a> {
    config: &'a SiteConfig,
    css: String,
    categories: Vec<CategoryGroup<'a>>,
    /// Exact category values offered by the search filter.
    filter_options: Vec<String>,
}

pub fn generate(
    corpus: &Corpus,
    source_root: &Path,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<GenerateReport, GenerateError> {
    let config = &corpus.config;
    let entries = &corpus.entries;

    let records = build_index(entries);

    // Generate CSS with colors from config
    let color_css = config::generate_color_css(&config.colors);
    let site = Site {
        config,
        css: format!("{}\n\n{}", color_css, CSS_STATIC),
        categories: category_groups(entries),
        filter_options: filter_options(&records),
    };

    fs::create_dir_all(output_dir)?;

    let assets_dir = source_root.join(ASSETS_DIR);
    let assets_copied = if assets_dir.is_dir() {
        copy_dir_recursive(&assets_dir, output_dir)?
    } else {
        0
    };

    // Search index
    let index_json = serde_json::to_string(&records)?;
    write_file(&output_dir.join(SEARCH_INDEX_PATH), &index_json)?;
    info!(records = records.len(), bytes = index_json.len(), "wrote search index");

    write_page(&output_dir.join("index.html"), render_index(&site, entries))?;
    write_page(&output_dir.join("search/index.html"), render_search_page(&site))?;
    write_page(&output_dir.join("404.html"), render_not_found(&site))?;

    for group in &site.categories {
        let path = output_dir.join("category").join(&group.slug).join("index.html");
        write_page(&path, render_category_page(&site, group))?;
        debug!(category = group.label, terms = group.entries.len(), "wrote category page");
    }

    entries.par_iter().try_for_each(|entry| {
        let path = output_dir.join("glossary").join(&entry.slug).join("index.html");
        write_page(&path, render_term_page(&site, entry, entries))?;
        debug!(slug = %entry.slug, "wrote term page");
        Ok::<(), GenerateError>(())
    })?;
    info!(terms = entries.len(), categories = site.categories.len(), "wrote pages");

    write_file(
        &output_dir.join("sitemap.xml"),
        &seo::sitemap_xml(entries, config, now.date_naive()),
    )?;
    write_file(
        &output_dir.join("sitemap-news.xml"),
        &seo::sitemap_news_xml(entries, config, now.date_naive()),
    )?;
    write_file(
        &output_dir.join("sitemap-index.xml"),
        &seo::sitemap_index_xml(config, now),
    )?;
    write_file(&output_dir.join("rss.xml"), &seo::rss_xml(entries, config, now))?;
    write_file(&output_dir.join("robots.txt"), &seo::robots_txt(config))?;
    write_file(
        &output_dir.join("humans.txt"),
        &seo::humans_txt(config, now.date_naive()),
    )?;
    write_file(
        &output_dir.join(".well-known/security.txt"),
        &seo::security_txt(config, now),
    )?;
    write_file(
        &output_dir.join("manifest.webmanifest"),
        &seo::web_manifest(config),
    )?;
    write_file(&output_dir.join("site.js"), JS)?;

    info!(output = %output_dir.display(), "site generated");
    Ok(GenerateReport {
        term_pages: entries.len(),
        category_pages: site.categories.len(),
        index_records: records.len(),
        index_bytes: index_json.len(),
        assets_copied,
    })
}

/// Group entries by category slug, in first-seen order. Entries whose
/// category has no slug get no category page.
fn category_groups(entries: &[ContentEntry]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for entry in entries {
        let slug = slugify(&entry.category);
        if slug.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|g| g.slug == slug) {
            Some(group) => group.entries.push(entry),
            None => groups.push(CategoryGroup {
                slug,
                label: &entry.category,
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Non-empty categories of the index, spelled exactly as the filter matches them.
fn filter_options(records: &[SearchRecord]) -> Vec<String> {
    categories(records)
        .into_iter()
        .filter(|category| !category.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn write_page(path: &Path, markup: Markup) -> std::io::Result<()> {
    write_file(path, &markup.into_string())
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Markdown to HTML with GitHub-style extensions.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

/// JSON made safe for embedding in a `<script>` element.
fn script_json(json: &str) -> PreEscaped<String> {
    PreEscaped(json.replace("</", "<\\/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Per-page `<head>` values.
struct PageHead {
    title: String,
    description: String,
    canonical: Option<String>,
    og_type: &'static str,
    keywords: Vec<String>,
    structured_data: Option<String>,
}

/// Renders the base HTML document structure
fn base_document(site: &Site<'_>, head: &PageHead, content: Markup) -> Markup {
    let config = site.config;
    html! {
        (DOCTYPE)
        html lang=(config.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.title) }
                meta name="description" content=(head.description);
                @if !head.keywords.is_empty() {
                    meta name="keywords" content=(head.keywords.join(", "));
                }
                @if let Some(url) = &head.canonical {
                    link rel="canonical" href=(url);
                    meta property="og:url" content=(url);
                }
                meta property="og:title" content=(head.title);
                meta property="og:description" content=(head.description);
                meta property="og:type" content=(head.og_type);
                meta property="og:site_name" content=(config.site.name);
                meta name="theme-color" content=(config.site.theme_color);
                link rel="manifest" href="/manifest.webmanifest";
                link rel="author" href="/humans.txt";
                link rel="alternate" type="application/rss+xml" title=(config.feed.title) href="/rss.xml";
                style { (PreEscaped(&site.css)) }
                @if let Some(data) = &head.structured_data {
                    script type="application/ld+json" { (script_json(data)) }
                }
                script src="/site.js" defer {}
            }
            body {
                a.skip-link href="#main" { "Skip to content" }
                (site_header(config))
                main #main {
                    (content)
                }
                footer.site-footer {
                    p {
                        (config.site.name) " · "
                        a href="/rss.xml" { "RSS" }
                        " · "
                        a href="/sitemap.xml" { "Sitemap" }
                    }
                }
            }
        }
    }
}

/// Renders the site header with title link, navigation and theme toggle
fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (config.site.name) }
            nav.site-nav aria-label="Main" {
                ul {
                    li { a href="/" { "Terms" } }
                    li { a href="/search/" { "Search" } }
                }
            }
            button.theme-toggle type="button" data-theme-toggle aria-label="Toggle color theme" { "◐" }
        }
    }
}

/// Renders the search form. Submits to the search page without JavaScript.
fn search_form(site: &Site<'_>) -> Markup {
    html! {
        form.search-form #search-form action="/search/" method="get" role="search" {
            label.visually-hidden for="search-input" { "Search terms" }
            input #search-input type="search" name="q" list="search-suggestions"
                placeholder="Search terms, e.g. API" autocomplete="off";
            datalist #search-suggestions {}
            label.visually-hidden for="search-category" { "Category" }
            select #search-category name="category" {
                option value="all" { "All categories" }
                @for category in &site.filter_options {
                    option value=(category) { (category) }
                }
            }
            button type="submit" { "Search" }
        }
    }
}

fn term_card(entry: &ContentEntry) -> Markup {
    html! {
        li.term-card {
            a href=(entry.url_path()) {
                span.term-title { (entry.title) }
            }
            span.term-category { (entry.category) }
            p.term-description { (entry.description) }
        }
    }
}

fn related_section(related: &RelatedTerms<'_>) -> Markup {
    html! {
        @match related {
            RelatedTerms::Explicit(entries) => {
                section.related aria-labelledby="related-heading" {
                    h2 #related-heading { "Related terms" }
                    @for (category, group) in grouped_by_category(entries) {
                        h3 { (category) }
                        ul.term-list {
                            @for entry in group {
                                (term_card(entry))
                            }
                        }
                    }
                }
            }
            RelatedTerms::Suggested(entries) => {
                section.related aria-labelledby="related-heading" {
                    h2 #related-heading { "Suggested terms" }
                    ul.term-list {
                        @for entry in entries {
                            (term_card(entry))
                        }
                    }
                }
            }
            RelatedTerms::None => {}
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page: search, categories, and every term
fn render_index(site: &Site<'_>, entries: &[ContentEntry]) -> Markup {
    let config = site.config;
    let head = PageHead {
        title: config.site.title.clone(),
        description: seo::sanitize_meta_description(&config.site.description),
        canonical: Some(config.full_url("/")),
        og_type: "website",
        keywords: Vec::new(),
        structured_data: Some(seo::site_structured_data(config)),
    };

    let content = html! {
        h1 { (config.site.title) }
        p.lead { (config.site.description) }
        (search_form(site))
        nav.category-nav aria-label="Categories" {
            h2 { "Categories" }
            ul {
                @for group in &site.categories {
                    li {
                        a href=(category_path(group.label)) {
                            (group.label) " (" (group.entries.len()) ")"
                        }
                    }
                }
            }
        }
        section aria-labelledby="all-terms" {
            h2 #all-terms { "All terms (" (entries.len()) ")" }
            ul.term-list {
                @for entry in entries {
                    (term_card(entry))
                }
            }
        }
    };

    base_document(site, &head, content)
}

/// Renders one term page
fn render_term_page(site: &Site<'_>, entry: &ContentEntry, corpus: &[ContentEntry]) -> Markup {
    let config = site.config;
    let meta = seo::term_meta(entry, config);
    let head = PageHead {
        title: meta.title,
        description: meta.description,
        canonical: Some(meta.canonical_url),
        og_type: "article",
        keywords: meta.keywords,
        structured_data: Some(seo::term_structured_data(entry, config)),
    };
    let minutes = seo::reading_time_minutes(&entry.body);
    let body_html = render_markdown(&entry.body);
    let related = resolve_related(entry, corpus);

    let content = html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { "Home" }
            " › "
            a href=(category_path(&entry.category)) { (entry.category) }
            " › "
            span aria-current="page" { (entry.title) }
        }
        article.term {
            header.term-header {
                h1 { (entry.title) }
                div.term-meta {
                    a href=(category_path(&entry.category)) { (entry.category) }
                    span { (minutes) " min read" }
                    @if let Some(date) = entry.last_updated {
                        time datetime=(date.format("%Y-%m-%d").to_string()) {
                            "Updated " (date.format("%B %-d, %Y").to_string())
                        }
                    }
                }
                @if !entry.tags.is_empty() {
                    ul.tags aria-label="Tags" {
                        @for tag in &entry.tags {
                            li { (tag) }
                        }
                    }
                }
            }
            p.lead { (entry.description) }
            div.term-body {
                (PreEscaped(body_html))
            }
        }
        (related_section(&related))
    };

    base_document(site, &head, content)
}

/// Renders a category listing
fn render_category_page(site: &Site<'_>, group: &CategoryGroup<'_>) -> Markup {
    let config = site.config;
    let head = PageHead {
        title: format!("{} terms | {}", group.label, config.site.name),
        description: seo::sanitize_meta_description(&format!(
            "All {} {} terms in {}, with definitions and examples.",
            group.entries.len(),
            group.label,
            config.site.name
        )),
        canonical: Some(config.full_url(&category_path(group.label))),
        og_type: "website",
        keywords: Vec::new(),
        structured_data: None,
    };

    let content = html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { "Home" }
            " › "
            span aria-current="page" { (group.label) }
        }
        h1 { (group.label) }
        ul.term-list {
            @for entry in &group.entries {
                (term_card(entry))
            }
        }
    };

    base_document(site, &head, content)
}

/// Renders the client-side search page
fn render_search_page(site: &Site<'_>) -> Markup {
    let config = site.config;
    let head = PageHead {
        title: format!("Search | {}", config.site.name),
        description: format!("Search the {} glossary", config.site.name),
        canonical: Some(config.full_url("/search/")),
        og_type: "website",
        keywords: Vec::new(),
        structured_data: None,
    };

    let content = html! {
        h1 { "Search" }
        (search_form(site))
        p #search-status role="status" aria-live="polite" {}
        ul.term-list #search-results {}
        noscript {
            p { "Search needs JavaScript. You can still " a href="/" { "browse all terms" } "." }
        }
    };

    base_document(site, &head, content)
}

/// Renders the not-found page
fn render_not_found(site: &Site<'_>) -> Markup {
    let config = site.config;
    let head = PageHead {
        title: format!("Page not found | {}", config.site.name),
        description: "The requested page does not exist.".to_string(),
        canonical: None,
        og_type: "website",
        keywords: Vec::new(),
        structured_data: None,
    };

    let content = html! {
        h1 { "Page not found" }
        p {
            "That term is not in the glossary yet. Try "
            a href="/search/" { "searching" }
            " or go back to "
            a href="/" { "all terms" }
            "."
        }
    };

    base_document(site, &head, content)
}

// ============================================================================
// Tests
// ============================================================================
