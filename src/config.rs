//! `config.toml`: defaults, loading and validation.
//!
//! The file sits in the content root and is layered over the built-in
//! defaults, so a site only writes down the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Every key is optional; these are the defaults
//!
//! [site]
//! name = "TechGloss"
//! url = "https://techgloss.dev"       # Absolute base URL, no trailing slash needed
//! language = "en"
//!
//! [feed]
//! max_items = 50                      # Most recent terms in rss.xml
//!
//! [sitemap]
//! term_changefreq = "weekly"
//! term_priority = 0.8
//! news_window_days = 30               # Terms updated this recently go in sitemap-news.xml
//!
//! [security]
//! contact = ["mailto:security@techgloss.dev"]
//! expires_days = 365                  # security.txt Expires, counted from the build
//!
//! [robots]
//! crawl_delay = 1                     # 0 omits the directive
//! disallow = ["/admin/", "/.well-known/", "/api/"]
//!
//! [search]
//! suggestion_limit = 5
//! cache_ttl_secs = 3600               # search-index.json cache lifetime
//!
//! [colors.light]
//! background = "#fcfcfd"
//! highlight = "#bbf7d0"               # Background of search matches
//!
//! [processing]
//! max_processes = 4                   # Render workers (omit for auto = CPU cores)
//! ```
//!
//! Run `techgloss gen-config` for the full documented file. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

use crate::search::DEFAULT_SUGGESTION_LIMIT;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config.toml: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Validation(String),
}

/// Resolved site settings.
///
/// Every section has a default; `config.toml` overrides individual keys and
/// may not introduce keys of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity used in page titles, feeds, and absolute URLs.
    pub site: SiteInfo,
    /// RSS feed settings.
    pub feed: FeedConfig,
    /// Sitemap change frequencies and priorities.
    pub sitemap: SitemapConfig,
    /// robots.txt directives.
    pub robots: RobotsConfig,
    /// `.well-known/security.txt` fields.
    pub security: SecurityConfig,
    /// `humans.txt` credits.
    pub humans: HumansConfig,
    /// Search index, suggestion, and endpoint cache settings.
    pub search: SearchConfig,
    /// Light and dark palettes.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Reject values that would produce a broken site.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(!self.site.name.trim().is_empty(), "site.name must not be empty")?;
        ensure(
            self.site.url.starts_with("http://") || self.site.url.starts_with("https://"),
            "site.url must start with http:// or https://",
        )?;
        for (key, priority) in [
            ("sitemap.home_priority", self.sitemap.home_priority),
            ("sitemap.term_priority", self.sitemap.term_priority),
            ("sitemap.category_priority", self.sitemap.category_priority),
        ] {
            ensure(
                (0.0..=1.0).contains(&priority),
                format!("{key} must be between 0.0 and 1.0"),
            )?;
        }
        ensure(self.feed.max_items > 0, "feed.max_items must be at least 1")?;
        ensure(
            self.sitemap.news_max_items > 0,
            "sitemap.news_max_items must be at least 1",
        )?;
        ensure(
            !self.security.contact.is_empty(),
            "security.contact needs at least one address",
        )?;
        ensure(
            self.security.expires_days > 0,
            "security.expires_days must be at least 1",
        )?;
        ensure(
            self.search.suggestion_limit > 0,
            "search.suggestion_limit must be at least 1",
        )?;
        ensure(
            self.search.cache_ttl_secs > 0,
            "search.cache_ttl_secs must be at least 1",
        )
    }

    /// Absolute URL for a site-relative path.
    ///
    /// `full_url("/glossary/api/")` → `"https://techgloss.dev/glossary/api/"`.
    pub fn full_url(&self, path: &str) -> String {
        let base = self.site.url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

fn ensure(ok: bool, message: impl Into<String>) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Validation(message.into()))
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Short site name, appended to page titles.
    pub name: String,
    /// Absolute base URL of the deployed site.
    pub url: String,
    /// Home page title.
    pub title: String,
    /// Default meta description.
    pub description: String,
    /// BCP 47 language tag for `<html lang>` and the feed.
    pub language: String,
    /// Organization or author credited in the feed.
    pub author: String,
    /// Browser UI color for the web manifest.
    pub theme_color: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "TechGloss".to_string(),
            url: "https://techgloss.dev".to_string(),
            title: "TechGloss - Technical glossary for developers".to_string(),
            description: "A glossary of software development terms with examples and plain-language explanations.".to_string(),
            language: "en".to_string(),
            author: "TechGloss".to_string(),
            theme_color: "#22c55e".to_string(),
        }
    }
}

/// RSS feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub title: String,
    pub description: String,
    /// Maximum number of items, newest first.
    pub max_items: usize,
    /// Channel `<ttl>` in minutes.
    pub ttl_minutes: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "TechGloss - New and updated terms".to_string(),
            description: "New and updated technical terms from TechGloss".to_string(),
            max_items: 50,
            ttl_minutes: 1440,
        }
    }
}

/// Sitemap `<changefreq>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// Sitemap settings per page kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    pub home_changefreq: ChangeFreq,
    pub home_priority: f64,
    pub term_changefreq: ChangeFreq,
    pub term_priority: f64,
    pub category_changefreq: ChangeFreq,
    pub category_priority: f64,
    /// Days back from the build date that count as news.
    pub news_window_days: u32,
    /// Cap on `sitemap-news.xml` entries.
    pub news_max_items: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            home_changefreq: ChangeFreq::Daily,
            home_priority: 1.0,
            term_changefreq: ChangeFreq::Weekly,
            term_priority: 0.8,
            category_changefreq: ChangeFreq::Weekly,
            category_priority: 0.6,
            news_window_days: 30,
            news_max_items: 1000,
        }
    }
}

/// robots.txt directives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotsConfig {
    /// Seconds between requests; 0 omits the directive.
    pub crawl_delay: u32,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            crawl_delay: 1,
            allow: vec!["/glossary/".to_string()],
            disallow: vec![
                "/admin/".to_string(),
                "/.well-known/".to_string(),
                "/api/".to_string(),
            ],
        }
    }
}

/// `security.txt` fields (RFC 9116).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// `mailto:` or `https:` URIs, one `Contact:` line each.
    pub contact: Vec<String>,
    /// `Expires` is the build time plus this many days.
    pub expires_days: u32,
    pub preferred_languages: Vec<String>,
    /// Disclosure policy URL; empty omits the field.
    pub policy: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            contact: vec!["mailto:security@techgloss.dev".to_string()],
            expires_days: 365,
            preferred_languages: vec!["en".to_string()],
            policy: String::new(),
        }
    }
}

/// `humans.txt` credits. Empty fields are left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HumansConfig {
    pub team: String,
    pub contact: String,
    pub location: String,
}

impl Default for HumansConfig {
    fn default() -> Self {
        Self {
            team: "TechGloss Team".to_string(),
            contact: "hello [at] techgloss.dev".to_string(),
            location: String::new(),
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Default number of suggestions returned for a partial query.
    pub suggestion_limit: usize,
    /// How long a built index is served before it is rebuilt, and the
    /// `max-age` sent with it.
    pub cache_ttl_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            cache_ttl_secs: 3600,
        }
    }
}

/// Worker pool settings for page rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Upper bound on rendering threads. Unset means one per core; larger
    /// values are capped at the core count.
    pub max_processes: Option<usize>,
}

/// Threads to give the rayon pool: the configured cap, between 1 and the
/// number of cores.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    match config.max_processes {
        Some(cap) => cap.clamp(1, cores),
        None => cores,
    }
}

/// Palettes for the two color themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// One palette, emitted as `--color-*` custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (breadcrumbs, tags, card descriptions).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
    /// Background of highlighted search matches.
    pub highlight: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fcfcfd".to_string(),
            text: "#0f172a".to_string(),
            text_muted: "#64748b".to_string(),
            border: "#e2e8f0".to_string(),
            link: "#15803d".to_string(),
            link_hover: "#166534".to_string(),
            highlight: "#bbf7d0".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0b1120".to_string(),
            text: "#e2e8f0".to_string(),
            text_muted: "#94a3b8".to_string(),
            border: "#1e293b".to_string(),
            link: "#4ade80".to_string(),
            link_hover: "#86efac".to_string(),
            highlight: "#14532d".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// File name looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

/// [`SiteConfig::default`] as a TOML table, the bottom layer of every merge.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Layer `overlay` over `base`.
///
/// Tables merge per key, recursively. Any other value in `overlay`, arrays
/// included, replaces the one in `base` outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, replacement) => replacement,
    }
}

/// Parse `root/config.toml` without interpreting it. `None` when the file
/// does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let content = match fs::read_to_string(root.join(CONFIG_FILE)) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&content)?))
}

/// Apply `overlay` (if any) to `base`, deserialize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = overlay.into_iter().fold(base, merge_toml).try_into()?;
    config.validate()?;
    Ok(config)
}

/// The site config for a content root: defaults, then `config.toml`.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Every key with its default and a comment, printed by `techgloss gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# TechGloss configuration
#
# Save as content/config.toml. Every key is optional and the values below
# are the built-in defaults, so delete whatever you do not change.
# Misspelled or unknown keys are an error.

# ===========================================================================
# Site identity
# ===========================================================================
[site]
name = "TechGloss"
# Absolute base URL of the deployed site. Used in the sitemap, feed,
# canonical links, and Open Graph tags.
url = "https://techgloss.dev"
# Home page <title>.
title = "TechGloss - Technical glossary for developers"
# Default meta description.
description = "A glossary of software development terms with examples and plain-language explanations."
# Language tag for <html lang> and the RSS feed.
language = "en"
# Credited in the RSS feed.
author = "TechGloss"
# Browser UI color for manifest.webmanifest.
theme_color = "#22c55e"

# ===========================================================================
# RSS feed (rss.xml)
# ===========================================================================
[feed]
title = "TechGloss - New and updated terms"
description = "New and updated technical terms from TechGloss"
# Only terms with last_updated are listed, newest first.
max_items = 50
# Channel <ttl> in minutes.
ttl_minutes = 1440

# ===========================================================================
# Sitemap (sitemap.xml)
# ===========================================================================
[sitemap]
# One of: always, hourly, daily, weekly, monthly, yearly, never.
home_changefreq = "daily"
home_priority = 1.0
term_changefreq = "weekly"
term_priority = 0.8
category_changefreq = "weekly"
category_priority = 0.6
# sitemap-news.xml lists terms updated within this many days of the build.
news_window_days = 30
news_max_items = 1000

# ===========================================================================
# robots.txt
# ===========================================================================
[robots]
# Seconds between crawler requests. 0 omits the directive.
crawl_delay = 1
allow = ["/glossary/"]
disallow = ["/admin/", "/.well-known/", "/api/"]

# ===========================================================================
# .well-known/security.txt
# ===========================================================================
[security]
# At least one mailto: or https: URI.
contact = ["mailto:security@techgloss.dev"]
# Expires is set this many days after each build.
expires_days = 365
preferred_languages = ["en"]
# Disclosure policy URL. Empty leaves the field out.
policy = ""

# ===========================================================================
# humans.txt
# ===========================================================================
[humans]
team = "TechGloss Team"
contact = "hello [at] techgloss.dev"
# Empty values are left out.
location = ""

# ===========================================================================
# Search
# ===========================================================================
[search]
# Suggestions returned for a partial query.
suggestion_limit = 5
# Lifetime of the served search index in seconds (`techgloss serve`), also
# sent as Cache-Control max-age.
cache_ttl_secs = 3600

# ===========================================================================
# Light theme
# ===========================================================================
[colors.light]
background = "#fcfcfd"
text = "#0f172a"
text_muted = "#64748b"    # Breadcrumbs, tags, card descriptions
border = "#e2e8f0"
link = "#15803d"
link_hover = "#166534"
highlight = "#bbf7d0"     # Search match background

# ===========================================================================
# Dark theme (system dark mode, or the toggle)
# ===========================================================================
[colors.dark]
background = "#0b1120"
text = "#e2e8f0"
text_muted = "#94a3b8"
border = "#1e293b"
link = "#4ade80"
link_hover = "#86efac"
highlight = "#14532d"

# ===========================================================================
# Rendering
# ===========================================================================
[processing]
# Cap on rendering threads. Unset means one per CPU core.
# max_processes = 4
"##
}

/// `--color-*` custom properties for both themes.
///
/// The dark scheme applies under `prefers-color-scheme: dark` unless the
/// visitor picked a theme explicitly (`data-theme` on `<html>`, set by
/// `site.js`).
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let light = scheme_properties(&colors.light, "    ");
    let dark = scheme_properties(&colors.dark, "    ");
    let dark_nested = scheme_properties(&colors.dark, "        ");
    format!(
        r#":root, :root[data-theme="light"] {{
{light}}}

@media (prefers-color-scheme: dark) {{
    :root:not([data-theme="light"]) {{
{dark_nested}    }}
}}

:root[data-theme="dark"] {{
{dark}}}"#
    )
}

fn scheme_properties(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
        ("--color-highlight", &scheme.highlight),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};\n"))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn content_root(config_toml: &str) -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE), config_toml).unwrap();
        root
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn defaults_describe_techgloss() {
        let config = SiteConfig::default();
        assert_eq!(config.site.name, "TechGloss");
        assert_eq!(config.site.url, "https://techgloss.dev");
        assert_eq!(config.site.language, "en");
        assert_eq!(config.feed.max_items, 50);
        assert_eq!(config.sitemap.term_changefreq, ChangeFreq::Weekly);
        assert_eq!(config.robots.disallow, vec!["/admin/", "/.well-known/", "/api/"]);
        assert_eq!(config.search.suggestion_limit, 5);
        assert_eq!(config.search.cache_ttl_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config: SiteConfig = toml::from_str("[colors.dark]\nlink = \"#38bdf8\"\n").unwrap();
        assert_eq!(config.colors.dark.link, "#38bdf8");
        assert_eq!(config.colors.dark.background, "#0b1120");
        assert_eq!(config.colors.light.text, "#0f172a");
        assert_eq!(config.feed.ttl_minutes, 1440);
    }

    #[test]
    fn changefreq_is_lowercase_and_closed() {
        let config: SiteConfig = toml::from_str("[sitemap]\ncategory_changefreq = \"monthly\"\n").unwrap();
        assert_eq!(config.sitemap.category_changefreq, ChangeFreq::Monthly);
        assert_eq!(ChangeFreq::Monthly.as_str(), "monthly");

        let bad: Result<SiteConfig, _> = toml::from_str("[sitemap]\nterm_changefreq = \"Weekly\"\n");
        assert!(bad.is_err());
    }

    #[test]
    fn full_url_handles_slashes() {
        let mut config = SiteConfig::default();
        assert_eq!(config.full_url("/glossary/dns/"), "https://techgloss.dev/glossary/dns/");
        assert_eq!(config.full_url("sitemap.xml"), "https://techgloss.dev/sitemap.xml");

        config.site.url = "https://docs.example.org/".to_string();
        assert_eq!(config.full_url("/"), "https://docs.example.org/");
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn missing_file_loads_defaults() {
        let root = TempDir::new().unwrap();
        assert!(load_raw_config(root.path()).unwrap().is_none());
        let config = load_config(root.path()).unwrap();
        assert_eq!(config.site.name, "TechGloss");
    }

    #[test]
    fn file_overrides_are_layered() {
        let root = content_root(
            r#"
[site]
name = "Kernel Terms"
url = "https://kernel.example"

[robots]
allow = ["/terms/"]
"#,
        );
        let config = load_config(root.path()).unwrap();
        assert_eq!(config.site.name, "Kernel Terms");
        assert_eq!(config.site.title, SiteInfo::default().title);
        // Arrays are replaced whole
        assert_eq!(config.robots.allow, vec!["/terms/"]);
        assert_eq!(config.robots.disallow.len(), 3);
    }

    #[test]
    fn malformed_file_is_toml_error() {
        let root = content_root("[site\nname = ");
        assert!(matches!(load_config(root.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let root = content_root("[search]\nsugestion_limit = 3\n");
        assert!(matches!(load_config(root.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[analytics]\nprovider = \"plausible\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn loaded_values_are_validated() {
        let root = content_root("[search]\ncache_ttl_secs = 0\n");
        let err = load_config(root.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("search.cache_ttl_secs"));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn url_needs_scheme() {
        let mut config = SiteConfig::default();
        config.site.url = "//techgloss.dev".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("site.url"));
    }

    #[test]
    fn blank_name_is_invalid() {
        let mut config = SiteConfig::default();
        config.site.name = "\t".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn priorities_are_inclusive_unit_range() {
        let mut config = SiteConfig::default();
        config.sitemap.home_priority = 0.0;
        config.sitemap.term_priority = 1.0;
        assert!(config.validate().is_ok());

        config.sitemap.term_priority = -0.1;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("sitemap.term_priority"));
    }

    #[test]
    fn counts_must_be_positive() {
        let mutations: [fn(&mut SiteConfig); 5] = [
            |c| c.feed.max_items = 0,
            |c| c.sitemap.news_max_items = 0,
            |c| c.security.expires_days = 0,
            |c| c.search.suggestion_limit = 0,
            |c| c.search.cache_ttl_secs = 0,
        ];
        for mutate in mutations {
            let mut config = SiteConfig::default();
            mutate(&mut config);
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn security_needs_a_contact() {
        let root = content_root("[security]\ncontact = []\n");
        let err = load_config(root.path()).unwrap_err();
        assert!(err.to_string().contains("security.contact"));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_replaces_scalars_and_keeps_siblings() {
        let base: toml::Value = toml::from_str("[feed]\nmax_items = 50\nttl_minutes = 60\n").unwrap();
        let overlay: toml::Value = toml::from_str("[feed]\nmax_items = 10\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["feed"]["max_items"].as_integer(), Some(10));
        assert_eq!(merged["feed"]["ttl_minutes"].as_integer(), Some(60));
    }

    #[test]
    fn merge_adds_new_keys() {
        let base: toml::Value = toml::from_str("[colors.light]\nlink = \"#000\"\n").unwrap();
        let overlay: toml::Value = toml::from_str("[colors.dark]\nlink = \"#fff\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["colors"]["light"]["link"].as_str(), Some("#000"));
        assert_eq!(merged["colors"]["dark"]["link"].as_str(), Some("#fff"));
    }

    #[test]
    fn resolve_without_overlay_is_defaults() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config.search.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
    }

    #[test]
    fn resolve_validates_merged_result() {
        let overlay: toml::Value = toml::from_str("[sitemap]\ncategory_priority = 1.2\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // gen-config output
    // =========================================================================

    #[test]
    fn stock_file_matches_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(toml::Value::try_from(parsed).unwrap(), stock_defaults_value());
    }

    #[test]
    fn stock_defaults_cover_every_section() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for section in [
            "site", "feed", "sitemap", "robots", "security", "humans", "search", "colors",
            "processing",
        ] {
            assert!(table.contains_key(section), "missing [{section}]");
        }
    }

    // =========================================================================
    // Threads and CSS
    // =========================================================================

    #[test]
    fn threads_default_to_core_count() {
        let cores = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn threads_are_clamped() {
        let cap = |n| ProcessingConfig { max_processes: Some(n) };
        assert_eq!(effective_threads(&cap(0)), 1);
        assert_eq!(effective_threads(&cap(1)), 1);
        assert_eq!(effective_threads(&cap(usize::MAX)), effective_threads(&ProcessingConfig::default()));
    }

    #[test]
    fn css_has_every_property_for_both_themes() {
        let css = generate_color_css(&ColorConfig::default());
        for property in [
            "--color-bg:",
            "--color-text:",
            "--color-text-muted:",
            "--color-border:",
            "--color-link:",
            "--color-link-hover:",
            "--color-highlight:",
        ] {
            assert_eq!(css.matches(property).count(), 3, "{property}");
        }
    }

    #[test]
    fn css_uses_configured_palette() {
        let mut colors = ColorConfig::default();
        colors.light.highlight = "#fde68a".to_string();
        colors.dark.highlight = "#78350f".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-highlight: #fde68a;"));
        assert!(css.contains("--color-highlight: #78350f;"));
        assert!(css.contains(r#":root[data-theme="dark"]"#));
        assert!(css.contains(r#":root:not([data-theme="light"])"#));
    }
}
