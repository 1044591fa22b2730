//! Search-engine and feed artifacts.
//!
//! Everything here is string templating over an already-validated corpus.
//! The build date is always a parameter, so output is byte-for-byte
//! reproducible in tests.
//!
//! | Artifact | Function |
//! |----------|----------|
//! | `sitemap.xml` | [`sitemap_xml`] |
//! | `sitemap-news.xml` | [`sitemap_news_xml`] |
//! | `sitemap-index.xml` | [`sitemap_index_xml`] |
//! | `rss.xml` | [`rss_xml`] |
//! | `robots.txt` | [`robots_txt`] |
//! | `manifest.webmanifest` | [`web_manifest`] |
//! | `humans.txt` | [`humans_txt`] |
//! | `.well-known/security.txt` | [`security_txt`] |
//! | `<meta name="description">` | [`sanitize_meta_description`], [`term_meta`] |
//! | JSON-LD | [`term_structured_data`], [`site_structured_data`] |

use chrono::{DateTime, Days, NaiveDate, SecondsFormat, TimeDelta, Utc};
use regex::Regex;
use serde_json::json;
use std::fmt::Write;
use std::sync::LazyLock;

use crate::config::{ChangeFreq, SiteConfig};
use crate::naming::{category_path, slugify};
use crate::search::escape_html;
use crate::types::ContentEntry;

/// Longest meta description search engines reliably show.
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
const ELLIPSIS: &str = "...";
const WORDS_PER_MINUTE: usize = 200;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Escape the five XML special characters. XML and HTML share them.
pub fn escape_xml(text: &str) -> String {
    escape_html(text)
}

// =============================================================================
// sitemap.xml
// =============================================================================

struct SitemapUrl {
    loc: String,
    lastmod: NaiveDate,
    changefreq: ChangeFreq,
    priority: f64,
}

/// Home page, one URL per term, and one per category page.
///
/// Terms without `last_updated` use `build_date`; a category's lastmod is
/// the newest date among its terms.
pub fn sitemap_xml(entries: &[ContentEntry], config: &SiteConfig, build_date: NaiveDate) -> String {
    let sitemap = &config.sitemap;
    let mut urls = vec![SitemapUrl {
        loc: config.full_url("/"),
        lastmod: build_date,
        changefreq: sitemap.home_changefreq,
        priority: sitemap.home_priority,
    }];

    urls.extend(entries.iter().map(|entry| SitemapUrl {
        loc: config.full_url(&entry.url_path()),
        lastmod: entry.last_updated.unwrap_or(build_date),
        changefreq: sitemap.term_changefreq,
        priority: sitemap.term_priority,
    }));

    let mut category_urls: Vec<(String, SitemapUrl)> = Vec::new();
    for entry in entries {
        let slug = slugify(&entry.category);
        if slug.is_empty() {
            continue;
        }
        let lastmod = entry.last_updated.unwrap_or(build_date);
        match category_urls.iter_mut().find(|(s, _)| *s == slug) {
            Some((_, url)) => url.lastmod = url.lastmod.max(lastmod),
            None => category_urls.push((
                slug,
                SitemapUrl {
                    loc: config.full_url(&category_path(&entry.category)),
                    lastmod,
                    changefreq: sitemap.category_changefreq,
                    priority: sitemap.category_priority,
                },
            )),
        }
    }
    urls.extend(category_urls.into_iter().map(|(_, url)| url));

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in &urls {
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&url.loc),
            url.lastmod.format("%Y-%m-%d"),
            url.changefreq.as_str(),
            url.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

// =============================================================================
// sitemap-news.xml and sitemap-index.xml
// =============================================================================

/// Dated entries updated within `window_days` before `build_date`, newest
/// first, capped at `max_items`. Same-day entries keep corpus order.
pub fn news_entries(
    entries: &[ContentEntry],
    build_date: NaiveDate,
    window_days: u32,
    max_items: usize,
) -> Vec<&ContentEntry> {
    let since = build_date
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);
    let mut recent: Vec<&ContentEntry> = entries
        .iter()
        .filter(|e| e.last_updated.is_some_and(|d| d >= since))
        .collect();
    recent.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    recent.truncate(max_items);
    recent
}

/// Google News sitemap of recently updated terms.
pub fn sitemap_news_xml(entries: &[ContentEntry], config: &SiteConfig, build_date: NaiveDate) -> String {
    let sitemap = &config.sitemap;
    let recent = news_entries(
        entries,
        build_date,
        sitemap.news_window_days,
        sitemap.news_max_items,
    );

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n        xmlns:news=\"http://www.google.com/schemas/sitemap-news/0.9\">\n",
    );
    for entry in recent {
        let Some(date) = entry.last_updated else {
            continue;
        };
        let date = date.format("%Y-%m-%d");
        let keywords: Vec<&str> = std::iter::once(entry.category.as_str())
            .chain(entry.tags.iter().map(String::as_str))
            .collect();
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <news:news>\n      <news:publication>\n        <news:name>{}</news:name>\n        <news:language>{}</news:language>\n      </news:publication>\n      <news:publication_date>{date}</news:publication_date>\n      <news:title>{}</news:title>\n      <news:keywords>{}</news:keywords>\n    </news:news>\n    <lastmod>{date}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&config.full_url(&entry.url_path())),
            escape_xml(&config.site.name),
            escape_xml(&config.site.language),
            escape_xml(&entry.title),
            escape_xml(&keywords.join(", ")),
            sitemap.term_changefreq.as_str(),
            sitemap.term_priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Sitemap index pointing at `sitemap.xml` and `sitemap-news.xml`.
pub fn sitemap_index_xml(config: &SiteConfig, now: DateTime<Utc>) -> String {
    let lastmod = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in ["/sitemap.xml", "/sitemap-news.xml"] {
        let _ = write!(
            xml,
            "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n  </sitemap>\n",
            escape_xml(&config.full_url(path)),
        );
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

// =============================================================================
// rss.xml
// =============================================================================

/// Entries that carry `last_updated`, newest first, capped at `max_items`.
///
/// Entries with the same date keep corpus order.
pub fn feed_entries(entries: &[ContentEntry], max_items: usize) -> Vec<&ContentEntry> {
    let mut dated: Vec<&ContentEntry> = entries
        .iter()
        .filter(|e| e.last_updated.is_some())
        .collect();
    dated.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    dated.truncate(max_items);
    dated
}

fn rfc2822(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().to_rfc2822())
        .unwrap_or_default()
}

/// RSS 2.0 feed of recently updated terms.
pub fn rss_xml(entries: &[ContentEntry], config: &SiteConfig, now: DateTime<Utc>) -> String {
    let items = feed_entries(entries, config.feed.max_items);
    let site_url = config.full_url("/");
    let pub_date = items
        .first()
        .and_then(|e| e.last_updated)
        .map(rfc2822)
        .unwrap_or_else(|| now.to_rfc2822());

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
    xml.push_str("  <channel>\n");
    let _ = writeln!(xml, "    <title>{}</title>", escape_xml(&config.feed.title));
    let _ = writeln!(
        xml,
        "    <description>{}</description>",
        escape_xml(&config.feed.description)
    );
    let _ = writeln!(xml, "    <link>{}</link>", escape_xml(&site_url));
    let _ = writeln!(xml, "    <language>{}</language>", escape_xml(&config.site.language));
    let _ = writeln!(
        xml,
        "    <copyright>© {} {}</copyright>",
        now.format("%Y"),
        escape_xml(&config.site.author)
    );
    let _ = writeln!(xml, "    <lastBuildDate>{}</lastBuildDate>", now.to_rfc2822());
    let _ = writeln!(xml, "    <pubDate>{pub_date}</pubDate>");
    let _ = writeln!(xml, "    <ttl>{}</ttl>", config.feed.ttl_minutes);
    let _ = writeln!(xml, "    <generator>techgloss</generator>");
    let _ = writeln!(
        xml,
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\" />",
        escape_xml(&config.full_url("/rss.xml"))
    );

    for entry in items {
        let link = escape_xml(&config.full_url(&entry.url_path()));
        xml.push_str("    <item>\n");
        let _ = writeln!(xml, "      <title>{}</title>", escape_xml(&entry.title));
        let _ = writeln!(
            xml,
            "      <description>{}</description>",
            escape_xml(&entry.description)
        );
        let _ = writeln!(xml, "      <link>{link}</link>");
        let _ = writeln!(xml, "      <guid isPermaLink=\"true\">{link}</guid>");
        if let Some(date) = entry.last_updated {
            let _ = writeln!(xml, "      <pubDate>{}</pubDate>", rfc2822(date));
        }
        for category in std::iter::once(&entry.category).chain(&entry.tags) {
            let _ = writeln!(xml, "      <category>{}</category>", escape_xml(category));
        }
        xml.push_str("    </item>\n");
    }

    xml.push_str("  </channel>\n</rss>\n");
    xml
}

// =============================================================================
// robots.txt and manifest
// =============================================================================

pub fn robots_txt(config: &SiteConfig) -> String {
    let robots = &config.robots;
    let mut txt = String::from("User-agent: *\nAllow: /\n");
    let _ = writeln!(txt, "\nSitemap: {}", config.full_url("/sitemap.xml"));
    if robots.crawl_delay > 0 {
        let _ = writeln!(txt, "\nCrawl-delay: {}", robots.crawl_delay);
    }
    if !robots.disallow.is_empty() {
        txt.push('\n');
        for path in &robots.disallow {
            let _ = writeln!(txt, "Disallow: {path}");
        }
    }
    if !robots.allow.is_empty() {
        txt.push('\n');
        for path in &robots.allow {
            let _ = writeln!(txt, "Allow: {path}");
        }
    }
    txt
}

/// `manifest.webmanifest` for installable-site metadata.
pub fn web_manifest(config: &SiteConfig) -> String {
    let manifest = json!({
        "name": config.site.title,
        "short_name": config.site.name,
        "description": config.site.description,
        "start_url": "/",
        "scope": "/",
        "display": "standalone",
        "background_color": config.colors.light.background,
        "theme_color": config.site.theme_color,
        "lang": config.site.language,
        "dir": "ltr",
        "categories": ["education", "reference", "developer-tools"],
    });
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}

// =============================================================================
// humans.txt and security.txt
// =============================================================================

/// `humans.txt` credits. Blank config values are left out.
pub fn humans_txt(config: &SiteConfig, build_date: NaiveDate) -> String {
    let humans = &config.humans;
    let mut txt = String::from("/* TEAM */\n");
    for (label, value) in [
        ("Developer", &humans.team),
        ("Contact", &humans.contact),
        ("From", &humans.location),
    ] {
        if !value.trim().is_empty() {
            let _ = writeln!(txt, "{label}: {value}");
        }
    }
    txt.push_str("\n/* SITE */\n");
    let _ = writeln!(txt, "Last update: {}", build_date.format("%Y-%m-%d"));
    let _ = writeln!(txt, "Language: {}", config.site.language);
    txt.push_str("Doctype: HTML5\nStandards: HTML5, CSS3, ES5\n");
    let _ = writeln!(txt, "Software: techgloss {}", env!("CARGO_PKG_VERSION"));
    txt
}

/// RFC 9116 `security.txt`, served from `/.well-known/security.txt`.
///
/// `Expires` is `now` plus `security.expires_days`, so every build renews it.
pub fn security_txt(config: &SiteConfig, now: DateTime<Utc>) -> String {
    let security = &config.security;
    let expires = now + TimeDelta::days(i64::from(security.expires_days));
    let mut txt = format!("# Security policy for {}\n", config.site.name);
    txt.push_str("# Format: https://www.rfc-editor.org/rfc/rfc9116\n\n");
    for contact in &security.contact {
        let _ = writeln!(txt, "Contact: {contact}");
    }
    let _ = writeln!(
        txt,
        "Expires: {}",
        expires.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    if !security.preferred_languages.is_empty() {
        let _ = writeln!(
            txt,
            "Preferred-Languages: {}",
            security.preferred_languages.join(", ")
        );
    }
    let _ = writeln!(
        txt,
        "Canonical: {}",
        config.full_url("/.well-known/security.txt")
    );
    if !security.policy.trim().is_empty() {
        let _ = writeln!(txt, "Policy: {}", security.policy);
    }
    txt
}

// =============================================================================
// Page metadata
// =============================================================================

/// Plain-text description suitable for `<meta name="description">`.
///
/// Tags are removed and whitespace collapsed. Longer text is cut at the last
/// word boundary before 157 characters and ends with `...`.
pub fn sanitize_meta_description(description: &str) -> String {
    let without_tags = HTML_TAG.replace_all(description, "");
    let clean = WHITESPACE.replace_all(&without_tags, " ").trim().to_string();
    if clean.chars().count() <= META_DESCRIPTION_MAX_CHARS {
        return clean;
    }

    let keep = META_DESCRIPTION_MAX_CHARS - ELLIPSIS.len();
    let truncated: String = clean.chars().take(keep).collect();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    format!("{}{ELLIPSIS}", &truncated[..cut])
}

/// Estimated minutes to read `markdown` at 200 words per minute, at least 1.
pub fn reading_time_minutes(markdown: &str) -> usize {
    let words = markdown.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Head metadata for a term page.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub keywords: Vec<String>,
}

pub fn term_meta(entry: &ContentEntry, config: &SiteConfig) -> TermMeta {
    let keywords = [&entry.title, &entry.category]
        .into_iter()
        .chain(&entry.tags)
        .cloned()
        .chain(std::iter::once(config.site.name.clone()))
        .collect();
    TermMeta {
        title: format!("{} | {} | {}", entry.title, entry.category, config.site.name),
        description: sanitize_meta_description(&format!(
            "What is {}? {}",
            entry.title, entry.description
        )),
        canonical_url: config.full_url(&entry.url_path()),
        keywords,
    }
}

/// JSON-LD `DefinedTerm` for a term page.
pub fn term_structured_data(entry: &ContentEntry, config: &SiteConfig) -> String {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "DefinedTerm",
        "name": entry.title,
        "description": entry.description,
        "url": config.full_url(&entry.url_path()),
        "termCode": entry.slug,
        "inDefinedTermSet": {
            "@type": "DefinedTermSet",
            "name": config.site.name,
            "url": config.full_url("/"),
        },
    });
    if let Some(date) = entry.last_updated {
        data["dateModified"] = json!(date.format("%Y-%m-%d").to_string());
    }
    data.to_string()
}

/// JSON-LD `WebSite` with a search action pointing at the search page.
pub fn site_structured_data(config: &SiteConfig) -> String {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.site.name,
        "url": config.full_url("/"),
        "inLanguage": config.site.language,
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{}?q={{search_term_string}}", config.full_url("/search/")),
            },
            "query-input": "required name=search_term_string",
        },
    })
    .to_string()
}
