//! Terminal output for every command.
//!
//! # Terms First, Files Second
//!
//! A glossary is read as a list of terms, so each line leads with the term's
//! position, title and category. The file it came from follows on an
//! indented `Source:` line, which is enough to jump to the markdown when a
//! check fails.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Terms
//! 001 API (Web Development)
//!     Source: glossary/api.md
//!     Related: rest-api, json
//! 002 JSON (Data Format)
//!     Source: glossary/json.md
//!
//! Categories
//!     Web Development (1)
//!     Data Format (1)
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Check
//!
//! ```text
//! Related terms
//!     error api.related invalid-related-term: Related term "rest" does not exist
//!         Did you mean: rest-api
//! Required fields: ok
//! Content structure: ok
//!
//! 2 terms checked (1 with related terms): 1 error, 0 warnings
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 JSON (Data Format) score 10
//!     JavaScript Object Notation
//!     /glossary/json/
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Search → search/index.html
//! Categories
//!     001 Web Development → category/web-development/index.html
//! Terms
//!     001 API → glossary/api/index.html
//! Search index → api/search-index.json (2 records, 612 bytes)
//!
//! Generated 2 term pages, 2 category pages, copied 1 asset
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function builds the lines as a `Vec<String>` and touches
//! nothing else; the matching `print_*` wrapper writes them to stdout. Tests
//! exercise the `format_*` side.

use crate::config::CONFIG_FILE;
use crate::generate::{GenerateReport, SEARCH_INDEX_PATH};
use crate::naming::slugify;
use crate::scan::{ASSETS_DIR, Corpus};
use crate::search::{SearchResult, highlight_with};
use crate::validate::{Issue, ValidationReport};
use std::path::Path;

/// ANSI bold, used to mark query matches in terminal output.
pub const BOLD_OPEN: &str = "\x1b[1m";
pub const BOLD_CLOSE: &str = "\x1b[0m";

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 API (Web Development)
/// 001 API
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!("{} {} ({})", format_index(index), title, d),
        _ => format!("{} {}", format_index(index), title),
    }
}

/// `1 error`, `2 errors`.
fn count_noun(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Category labels in first-seen order, one per category slug, with counts.
fn category_counts(corpus: &Corpus) -> Vec<(&str, usize)> {
    let mut counts: Vec<(String, &str, usize)> = Vec::new();
    for entry in &corpus.entries {
        let slug = slugify(&entry.category);
        if slug.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(s, _, _)| *s == slug) {
            Some((_, _, n)) => *n += 1,
            None => counts.push((slug, &entry.category, 1)),
        }
    }
    counts.into_iter().map(|(_, label, n)| (label, n)).collect()
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output showing the discovered glossary.
pub fn format_scan_output(corpus: &Corpus, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Terms".to_string());
    for (i, entry) in corpus.entries.iter().enumerate() {
        lines.push(entity_header(i + 1, &entry.title, Some(&entry.category)));
        lines.push(format!("{}Source: {}", indent(1), entry.source_path));
        if !entry.related.is_empty() {
            lines.push(format!("{}Related: {}", indent(1), entry.related.join(", ")));
        }
    }

    let categories = category_counts(corpus);
    if !categories.is_empty() {
        lines.push(String::new());
        lines.push("Categories".to_string());
        for (label, n) in categories {
            lines.push(format!("{}{} ({})", indent(1), label, n));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join(CONFIG_FILE).exists() {
        lines.push(format!("{}{}", indent(1), CONFIG_FILE));
    }
    if source_root.join(ASSETS_DIR).is_dir() {
        lines.push(format!("{}{}/", indent(1), ASSETS_DIR));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(corpus: &Corpus, source_root: &Path) {
    for line in format_scan_output(corpus, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Validation output
// ============================================================================

fn issue_lines(issue: &Issue) -> Vec<String> {
    let level = if issue.is_error() { "error" } else { "warning" };
    let mut lines = vec![format!(
        "{}{} {}.{} {}: {}",
        indent(1),
        level,
        issue.entry,
        issue.field,
        issue.kind,
        issue.message
    )];
    if !issue.suggestions.is_empty() {
        lines.push(format!(
            "{}Did you mean: {}",
            indent(2),
            issue.suggestions.join(", ")
        ));
    }
    lines
}

/// Format a validation report, one section per rule group.
pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (heading, issues) in [
        ("Related terms", &report.related_terms),
        ("Required fields", &report.required_fields),
        ("Content structure", &report.content_structure),
    ] {
        if issues.is_empty() {
            lines.push(format!("{}: ok", heading));
        } else {
            lines.push(heading.to_string());
            lines.extend(issues.iter().flat_map(issue_lines));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} checked ({} with related terms): {}, {}",
        count_noun(report.total_entries, "term", "terms"),
        report.entries_with_related,
        count_noun(report.error_count(), "error", "errors"),
        count_noun(report.warning_count(), "warning", "warnings"),
    ));
    lines
}

/// Print a validation report to stdout.
pub fn print_validation_report(report: &ValidationReport) {
    for line in format_validation_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Search output
// ============================================================================

/// Format ranked results. With `emphasize`, query matches in the title and
/// description are wrapped in ANSI bold.
pub fn format_search_results(results: &[SearchResult<'_>], query: &str, emphasize: bool) -> Vec<String> {
    if results.is_empty() {
        return vec![format!("No results for \"{}\"", query.trim())];
    }

    let mark = |text: &str| {
        if emphasize {
            highlight_with(text, query, BOLD_OPEN, BOLD_CLOSE)
        } else {
            text.to_string()
        }
    };

    let mut lines = Vec::new();
    for (i, result) in results.iter().enumerate() {
        let record = result.record;
        lines.push(format!(
            "{} score {}",
            entity_header(i + 1, &mark(&record.title), Some(&record.category)),
            result.score
        ));
        if !record.description.is_empty() {
            lines.push(format!(
                "{}{}",
                indent(1),
                mark(&truncate_desc(&record.description, 100))
            ));
        }
        lines.push(format!("{}/glossary/{}/", indent(1), record.slug));
    }
    lines
}

/// Print ranked results to stdout.
pub fn print_search_results(results: &[SearchResult<'_>], query: &str, emphasize: bool) {
    for line in format_search_results(results, query, emphasize) {
        println!("{}", line);
    }
}

/// Format suggestions, one per line.
pub fn format_suggestions(suggestions: &[String], query: &str) -> Vec<String> {
    if suggestions.is_empty() {
        return vec![format!("No suggestions for \"{}\"", query.trim())];
    }
    suggestions.to_vec()
}

/// Print suggestions to stdout.
pub fn print_suggestions(suggestions: &[String], query: &str) {
    for line in format_suggestions(suggestions, query) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format generate output showing every written page.
///
/// Each entity leads with its positional index and title, followed by `→`
/// and the output path.
pub fn format_generate_output(corpus: &Corpus, report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![
        "Home \u{2192} index.html".to_string(),
        "Search \u{2192} search/index.html".to_string(),
    ];

    let categories = category_counts(corpus);
    if !categories.is_empty() {
        lines.push("Categories".to_string());
        for (i, (label, _)) in categories.iter().enumerate() {
            lines.push(format!(
                "{}{} \u{2192} category/{}/index.html",
                indent(1),
                entity_header(i + 1, label, None),
                slugify(label)
            ));
        }
    }

    if !corpus.entries.is_empty() {
        lines.push("Terms".to_string());
        for (i, entry) in corpus.entries.iter().enumerate() {
            lines.push(format!(
                "{}{} \u{2192} glossary/{}/index.html",
                indent(1),
                entity_header(i + 1, &entry.title, None),
                entry.slug
            ));
        }
    }

    lines.push(format!(
        "Search index \u{2192} {} ({}, {} bytes)",
        SEARCH_INDEX_PATH,
        count_noun(report.index_records, "record", "records"),
        report.index_bytes
    ));

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, copied {}",
        count_noun(report.term_pages, "term page", "term pages"),
        count_noun(report.category_pages, "category page", "category pages"),
        count_noun(report.assets_copied, "asset", "assets"),
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(corpus: &Corpus, report: &GenerateReport) {
    for line in format_generate_output(corpus, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::search::{SearchOptions, run};
    use crate::test_helpers::*;
    use crate::validate::validate;

    fn corpus() -> Corpus {
        let mut entries = sample_entries();
        entries[0].related = vec!["json".to_string()];
        Corpus {
            entries,
            config: SiteConfig::default(),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_and_without_detail() {
        assert_eq!(entity_header(1, "API", Some("Web")), "001 API (Web)");
        assert_eq!(entity_header(2, "API", None), "002 API");
        assert_eq!(entity_header(3, "API", Some("")), "003 API");
    }

    #[test]
    fn truncate_desc_counts_chars() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("exactly", 7), "exactly");
        assert_eq!(truncate_desc("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn count_noun_pluralizes() {
        assert_eq!(count_noun(0, "error", "errors"), "0 errors");
        assert_eq!(count_noun(1, "error", "errors"), "1 error");
    }

    // =========================================================================
    // Scan
    // =========================================================================

    #[test]
    fn scan_output_lists_terms_and_categories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let lines = format_scan_output(&corpus(), tmp.path());
        assert_eq!(lines[0], "Terms");
        assert_eq!(lines[1], "001 API (Web Development)");
        assert_eq!(lines[2], "    Source: glossary/api.md");
        assert_eq!(lines[3], "    Related: json");
        assert_eq!(lines[4], "002 JSON (Data Format)");
        assert!(lines.contains(&"    Web Development (1)".to_string()));
        assert_eq!(lines.last().unwrap(), "Config");
    }

    #[test]
    fn scan_output_shows_config_and_assets() {
        let tmp = setup_fixtures();
        let lines = format_scan_output(&corpus(), tmp.path());
        assert!(lines.contains(&"    config.toml".to_string()));
        assert!(lines.contains(&"    assets/".to_string()));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn clean_report_is_all_ok() {
        let report = validate(&corpus().entries);
        let lines = format_validation_report(&report);
        assert_eq!(lines[0], "Related terms: ok");
        assert_eq!(lines[1], "Required fields: ok");
        assert_eq!(lines[2], "Content structure: ok");
        assert_eq!(
            lines.last().unwrap(),
            "2 terms checked (1 with related terms): 0 errors, 0 warnings"
        );
    }

    #[test]
    fn report_shows_issue_and_suggestions() {
        let mut entries = corpus().entries;
        entries[1].related = vec!["apii".to_string()];
        let report = validate(&entries);
        let lines = format_validation_report(&report);
        assert_eq!(lines[0], "Related terms");
        assert_eq!(
            lines[1],
            "    error json.related invalid-related-term: Related term \"apii\" does not exist"
        );
        assert_eq!(lines[2], "        Did you mean: api");
        assert!(lines.last().unwrap().ends_with("1 error, 0 warnings"));
    }

    // =========================================================================
    // Search
    // =========================================================================

    #[test]
    fn search_results_plain() {
        let index = sample_index();
        let results = run(&index, "json", &SearchOptions::default());
        let lines = format_search_results(&results, "json", false);
        assert_eq!(lines[0], "001 JSON (Data Format) score 10");
        assert_eq!(lines[1], "    JavaScript Object Notation");
        assert_eq!(lines[2], "    /glossary/json/");
    }

    #[test]
    fn search_results_emphasized() {
        let index = sample_index();
        let results = run(&index, "json", &SearchOptions::default());
        let lines = format_search_results(&results, "json", true);
        assert_eq!(lines[0], "001 \x1b[1mJSON\x1b[0m (Data Format) score 10");
    }

    #[test]
    fn no_results_message() {
        assert_eq!(
            format_search_results(&[], " zzz ", false),
            vec!["No results for \"zzz\""]
        );
    }

    #[test]
    fn suggestions_one_per_line() {
        let suggestions = vec!["API".to_string(), "api-gateway".to_string()];
        assert_eq!(format_suggestions(&suggestions, "ap"), suggestions);
        assert_eq!(
            format_suggestions(&[], "qq"),
            vec!["No suggestions for \"qq\""]
        );
    }

    // =========================================================================
    // Generate
    // =========================================================================

    #[test]
    fn generate_output_lists_pages() {
        let report = GenerateReport {
            term_pages: 2,
            category_pages: 2,
            index_records: 2,
            index_bytes: 612,
            assets_copied: 1,
        };
        let lines = format_generate_output(&corpus(), &report);
        assert_eq!(lines[0], "Home \u{2192} index.html");
        assert!(lines.contains(
            &"    001 Web Development \u{2192} category/web-development/index.html".to_string()
        ));
        assert!(lines.contains(&"    002 JSON \u{2192} glossary/json/index.html".to_string()));
        assert!(lines.contains(
            &"Search index \u{2192} api/search-index.json (2 records, 612 bytes)".to_string()
        ));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 2 term pages, 2 category pages, copied 1 asset"
        );
    }
}
