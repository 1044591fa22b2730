//! # TechGloss
//!
//! A static site generator for technical glossaries. Your filesystem is the
//! data source: each markdown file under `glossary/` is one term, its TOML
//! front matter holds the metadata, and the body is the definition.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/   →  Corpus             (filesystem → ContentEntry list + config)
//! 2. Validate  Corpus     →  ValidationReport   (errors block the build)
//! 3. Generate  Corpus     →  dist/              (HTML, search index, SEO files)
//! ```
//!
//! The search core sits beside the pipeline. The same functions rank results
//! for the `search` command, the HTTP endpoint, and (mirrored in
//! `static/site.js`) the generated search page, so all three agree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks `glossary/`, parses front matter, loads config |
//! | [`validate`] | Stage 2: related-term, required-field and content checks |
//! | [`generate`] | Stage 3: renders the site with Maud and writes every artifact |
//! | [`search`] | Index building, ranking, highlighting, suggestions, category filter |
//! | [`related`] | Related-term resolution with a suggested-terms fallback |
//! | [`seo`] | Sitemaps, RSS, robots.txt, humans.txt, security.txt, manifest, meta tags, JSON-LD |
//! | [`cache`] | TTL snapshot of the search index for the HTTP endpoint |
//! | [`serve`] | axum routes for the index, search and suggestions |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | [`ContentEntry`](types::ContentEntry), shared by every stage |
//! | [`naming`] | Slug rules and category URL paths |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Flat, Immutable Search Index
//!
//! The index is a `Vec<SearchRecord>` built in one pass and never mutated.
//! Ranking is a linear scan with additive per-field weights. A glossary has
//! hundreds of terms, not millions; a linear scan over that is fast enough in
//! the browser and keeps the Rust and JavaScript rankers easy to keep in sync.
//! Because nothing mutates a built index, the server shares one snapshot
//! across requests through an `Arc` and replaces it wholesale on refresh.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system, rather than Handlebars or Tera. Advantages:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions, not stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//!
//! ## Validation Before Generation
//!
//! A link to a term that does not exist is a bug in the content, so `build`
//! refuses to write a site with broken related terms or internal links.
//! Unknown slugs come with suggestions of similar existing ones. Style issues
//! (overlong titles, code fences without a language) are warnings only.
//!
//! ## Flat URLs
//!
//! Subdirectories under `glossary/` are for authors; every term is served
//! at `/glossary/{slug}/`. Moving a file between folders never breaks a link.

pub mod cache;
pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod related;
pub mod scan;
pub mod search;
pub mod seo;
pub mod serve;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
