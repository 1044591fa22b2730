//! Content discovery and front-matter parsing.
//!
//! Stage 1 of the techgloss build pipeline. Walks the glossary directory,
//! parses each markdown file into a [`ContentEntry`], and loads the site
//! configuration.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root (--source)
//! ├── config.toml                  # Site configuration (optional)
//! ├── assets/                      # Copied verbatim to the output root (optional)
//! │   └── logo.svg
//! └── glossary/
//!     ├── api.md                   # One file per term
//!     ├── rest-api.mdx
//!     ├── networking/              # Subdirectories are for authors only;
//!     │   └── dns.md               # URLs stay flat (/glossary/dns/)
//!     └── .drafts/                 # Hidden files and directories are skipped
//! ```
//!
//! ## Front Matter
//!
//! Each file starts with a TOML block between `+++` lines:
//!
//! ```text
//! +++
//! title = "REST API"
//! description = "An architectural style for networked APIs"
//! category = "Web Development"
//! tags = ["http", "architecture"]
//! related = ["api", "http"]
//! last_updated = 2024-03-01
//! +++
//! Body in **markdown**.
//! ```
//!
//! `slug` may be set explicitly; otherwise the file stem is used. Missing
//! `title`, `description` or `category` load as empty strings so that
//! [`validate`](crate::validate) can report every problem at once instead of
//! the scan stopping at the first.
//!
//! ## Ordering
//!
//! Files are visited in sorted path order. That order is the corpus order,
//! which decides index order, tie order in search results, and fallback
//! related terms.

use crate::config::{self, SiteConfig};
use crate::naming::{is_valid_slug, slug_from_stem};
use crate::types::ContentEntry;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Term files live here, relative to the content root.
pub const GLOSSARY_DIR: &str = "glossary";
/// Static files copied as-is, relative to the content root.
pub const ASSETS_DIR: &str = "assets";

const ENTRY_EXTENSIONS: &[&str] = &["md", "mdx"];
const FRONT_MATTER_DELIMITER: &str = "+++";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Glossary directory not found: {0}")]
    MissingGlossaryDir(PathBuf),
    #[error("No +++ front matter block in {0}")]
    MissingFrontMatter(PathBuf),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("last_updated must be a calendar date in {0}")]
    InvalidDate(PathBuf),
    #[error("Invalid slug {slug:?} in {path} (allowed: ASCII letters, digits, '-', '_', '.')")]
    InvalidSlug { slug: String, path: PathBuf },
    #[error("Duplicate slug {slug:?} in {second} (first defined in {first})")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// Output of the scan stage: every entry plus the resolved site config.
#[derive(Debug)]
pub struct Corpus {
    pub entries: Vec<ContentEntry>,
    pub config: SiteConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrontMatter {
    slug: Option<String>,
    title: String,
    description: String,
    category: String,
    tags: Vec<String>,
    related: Vec<String>,
    #[serde(alias = "lastUpdated")]
    last_updated: Option<toml::value::Datetime>,
}

pub fn scan(root: &Path) -> Result<Corpus, ScanError> {
    let glossary = root.join(GLOSSARY_DIR);
    if !glossary.is_dir() {
        return Err(ScanError::MissingGlossaryDir(glossary));
    }

    let mut entries = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    let walker = WalkDir::new(&glossary)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for dir_entry in walker {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        if !dir_entry.file_type().is_file() || !is_entry_file(path) {
            continue;
        }

        let entry = read_entry(path, root)?;
        debug!(slug = %entry.slug, path = %entry.source_path, "parsed entry");

        if let Some(first) = seen.get(&entry.slug) {
            return Err(ScanError::DuplicateSlug {
                slug: entry.slug,
                first: first.clone(),
                second: entry.source_path,
            });
        }
        seen.insert(entry.slug.clone(), entry.source_path.clone());
        entries.push(entry);
    }

    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    info!(entries = entries.len(), root = %root.display(), "scan complete");
    Ok(Corpus { entries, config })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_entry_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            ENTRY_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

fn read_entry(path: &Path, root: &Path) -> Result<ContentEntry, ScanError> {
    let content = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let source_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    parse_entry(&content, &stem, path, source_path)
}

/// Parse one term file. `stem` is the slug fallback; `path` is used in errors.
pub fn parse_entry(
    content: &str,
    stem: &str,
    path: &Path,
    source_path: String,
) -> Result<ContentEntry, ScanError> {
    let (front, body) = split_front_matter(content)
        .ok_or_else(|| ScanError::MissingFrontMatter(path.to_path_buf()))?;
    let meta: FrontMatter = toml::from_str(front).map_err(|source| ScanError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;

    let slug = match meta.slug {
        Some(explicit) => explicit.trim().to_string(),
        None => slug_from_stem(stem),
    };
    if !is_valid_slug(&slug) {
        return Err(ScanError::InvalidSlug {
            slug,
            path: path.to_path_buf(),
        });
    }

    let last_updated = meta
        .last_updated
        .map(|dt| to_date(&dt).ok_or_else(|| ScanError::InvalidDate(path.to_path_buf())))
        .transpose()?;

    Ok(ContentEntry {
        slug,
        title: meta.title,
        description: meta.description,
        category: meta.category,
        tags: meta.tags,
        related: meta.related,
        body: body.to_string(),
        last_updated,
        source_path,
    })
}

fn to_date(datetime: &toml::value::Datetime) -> Option<NaiveDate> {
    let date = datetime.date?;
    NaiveDate::from_ymd_opt(i32::from(date.year), u32::from(date.month), u32::from(date.day))
}

/// Split a `+++`-delimited TOML block from the body.
///
/// The opening delimiter must be the first line (a UTF-8 BOM is tolerated).
/// Returns `(front_matter, body)`, or `None` when there is no complete block.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix(FRONT_MATTER_DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FRONT_MATTER_DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
