//! Build-time content checks.
//!
//! Validation runs over the whole corpus after [`scan`](crate::scan) and
//! before anything is generated. Each rule group produces [`Issue`]s tagged
//! with the entry slug and field they concern. Errors block `build`; warnings
//! are advisory.
//!
//! | Group | Rules |
//! |-------|-------|
//! | related terms | `invalid-related-term`, `self-reference`, `duplicate-reference` |
//! | required fields | `missing-required-field`, `field-too-long` |
//! | content structure | `empty-content`, `broken-internal-link`, `missing-code-language` |
//!
//! Unknown slugs (in `related` or in `/glossary/...` links) come with up to
//! three similar existing slugs, found by containment or an edit distance of
//! at most two.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::types::ContentEntry;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_SUGGESTIONS: usize = 3;
const MAX_SUGGESTION_DISTANCE: usize = 2;

static INTERNAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(/glossary/([^)]+)\)").expect("valid internal-link pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    MissingRequiredField,
    InvalidRelatedTerm,
    BrokenInternalLink,
    SelfReference,
    DuplicateReference,
    EmptyContent,
    MissingCodeLanguage,
    FieldTooLong,
}

impl IssueKind {
    /// Stable kebab-case identifier shown in reports.
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::MissingRequiredField => "missing-required-field",
            IssueKind::InvalidRelatedTerm => "invalid-related-term",
            IssueKind::BrokenInternalLink => "broken-internal-link",
            IssueKind::SelfReference => "self-reference",
            IssueKind::DuplicateReference => "duplicate-reference",
            IssueKind::EmptyContent => "empty-content",
            IssueKind::MissingCodeLanguage => "missing-code-language",
            IssueKind::FieldTooLong => "field-too-long",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            IssueKind::MissingRequiredField
            | IssueKind::InvalidRelatedTerm
            | IssueKind::BrokenInternalLink => Severity::Error,
            IssueKind::SelfReference
            | IssueKind::DuplicateReference
            | IssueKind::EmptyContent
            | IssueKind::MissingCodeLanguage
            | IssueKind::FieldTooLong => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One finding, attributed to an entry and field.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub kind: IssueKind,
    /// Slug of the entry the issue was found in.
    pub entry: String,
    pub field: &'static str,
    /// The offending value, when there is a single one (e.g. the unknown slug).
    pub value: Option<String>,
    pub message: String,
    /// Existing slugs that may have been meant.
    pub suggestions: Vec<String>,
}

impl Issue {
    fn new(kind: IssueKind, entry: &ContentEntry, field: &'static str, message: String) -> Self {
        Self {
            kind,
            entry: entry.slug.clone(),
            field,
            value: None,
            message,
            suggestions: Vec::new(),
        }
    }

    fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// Result of [`validate`]: per-group issues plus corpus counts.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub total_entries: usize,
    pub entries_with_related: usize,
    pub related_terms: Vec<Issue>,
    pub required_fields: Vec<Issue>,
    pub content_structure: Vec<Issue>,
}

impl ValidationReport {
    /// All issues, grouped as in the table above.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.related_terms
            .iter()
            .chain(&self.required_fields)
            .chain(&self.content_structure)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues().filter(|i| !i.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// True when nothing blocks a build.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Run every rule group over the corpus.
pub fn validate(entries: &[ContentEntry]) -> ValidationReport {
    ValidationReport {
        total_entries: entries.len(),
        entries_with_related: entries.iter().filter(|e| !e.related.is_empty()).count(),
        related_terms: validate_related_terms(entries),
        required_fields: validate_required_fields(entries),
        content_structure: validate_content_structure(entries),
    }
}

/// Unknown, self-referencing and repeated `related` slugs.
pub fn validate_related_terms(entries: &[ContentEntry]) -> Vec<Issue> {
    let slugs = corpus_slugs(entries);
    let known: HashSet<&str> = slugs.iter().copied().collect();
    let mut issues = Vec::new();

    for entry in entries {
        for related in &entry.related {
            if !known.contains(related.as_str()) {
                issues.push(
                    Issue::new(
                        IssueKind::InvalidRelatedTerm,
                        entry,
                        "related",
                        format!("Related term \"{related}\" does not exist"),
                    )
                    .with_value(related)
                    .with_suggestions(similar_slugs(related, &slugs)),
                );
            }
        }

        if entry.related.iter().any(|r| *r == entry.slug) {
            issues.push(Issue::new(
                IssueKind::SelfReference,
                entry,
                "related",
                format!("Term \"{}\" references itself in related terms", entry.slug),
            ));
        }

        let duplicates = duplicated(&entry.related);
        if !duplicates.is_empty() {
            issues.push(Issue::new(
                IssueKind::DuplicateReference,
                entry,
                "related",
                format!("Duplicate related terms found: {}", duplicates.join(", ")),
            ));
        }
    }
    issues
}

/// Empty required fields and over-long display strings.
pub fn validate_required_fields(entries: &[ContentEntry]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for entry in entries {
        for (field, value, label) in [
            ("title", &entry.title, "Title"),
            ("description", &entry.description, "Description"),
            ("category", &entry.category, "Category"),
        ] {
            if value.trim().is_empty() {
                issues.push(Issue::new(
                    IssueKind::MissingRequiredField,
                    entry,
                    field,
                    format!("{label} is required"),
                ));
            }
        }

        for (field, value, label, max) in [
            ("title", &entry.title, "Title", MAX_TITLE_CHARS),
            ("description", &entry.description, "Description", MAX_DESCRIPTION_CHARS),
        ] {
            let len = value.chars().count();
            if len > max {
                issues.push(Issue::new(
                    IssueKind::FieldTooLong,
                    entry,
                    field,
                    format!("{label} is {len} characters (recommended: < {max})"),
                ));
            }
        }
    }
    issues
}

/// Empty bodies, links to unknown terms, and code fences without a language.
pub fn validate_content_structure(entries: &[ContentEntry]) -> Vec<Issue> {
    let slugs = corpus_slugs(entries);
    let known: HashSet<&str> = slugs.iter().copied().collect();
    let mut issues = Vec::new();

    for entry in entries {
        if entry.body.trim().is_empty() {
            issues.push(Issue::new(
                IssueKind::EmptyContent,
                entry,
                "body",
                "Entry has no content body".to_string(),
            ));
        }

        for linked in internal_link_targets(&entry.body) {
            if !known.contains(linked) {
                issues.push(
                    Issue::new(
                        IssueKind::BrokenInternalLink,
                        entry,
                        "body",
                        format!("Broken internal link to \"/glossary/{linked}\""),
                    )
                    .with_value(linked)
                    .with_suggestions(similar_slugs(linked, &slugs)),
                );
            }
        }

        for line in unlabeled_fence_lines(&entry.body) {
            issues.push(Issue::new(
                IssueKind::MissingCodeLanguage,
                entry,
                "body",
                format!("Code block without a language tag (line {line})"),
            ));
        }
    }
    issues
}

fn corpus_slugs(entries: &[ContentEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.slug.as_str()).collect()
}

/// Slugs that appear more than once, each reported once, in first-repeat order.
fn duplicated(slugs: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for slug in slugs {
        if !seen.insert(slug.as_str()) && !repeated.contains(&slug.as_str()) {
            repeated.push(slug.as_str());
        }
    }
    repeated
}

/// Slugs targeted by `[text](/glossary/<slug>)` links, without a trailing `/`
/// or `#fragment`.
fn internal_link_targets(body: &str) -> Vec<&str> {
    INTERNAL_LINK
        .captures_iter(body)
        .filter_map(|caps| caps.get(2))
        .map(|target| {
            let target = target.as_str();
            let target = target.split('#').next().unwrap_or(target);
            target.trim_end_matches('/')
        })
        .filter(|target| !target.is_empty())
        .collect()
}

/// 1-based line numbers of opening ```` ``` ```` fences with no info string.
///
/// Closing fences are tracked so they are not mistaken for openers.
fn unlabeled_fence_lines(body: &str) -> Vec<usize> {
    let mut in_fence = false;
    let mut lines = Vec::new();
    for (i, line) in body.lines().enumerate() {
        let Some(info) = line.trim_start().strip_prefix("```") else {
            continue;
        };
        if !in_fence && info.trim().is_empty() {
            lines.push(i + 1);
        }
        in_fence = !in_fence;
    }
    lines
}

/// Up to three slugs resembling `target`, in corpus order.
///
/// A slug qualifies if either string contains the other or their edit
/// distance is at most two (both compared lowercase). An exact
/// case-insensitive match is skipped.
pub fn similar_slugs(target: &str, slugs: &[&str]) -> Vec<String> {
    let target = target.to_lowercase();
    if target.is_empty() {
        return Vec::new();
    }
    let mut found: Vec<String> = Vec::new();
    for &slug in slugs {
        let lower = slug.to_lowercase();
        if lower == target || found.iter().any(|f| f == slug) {
            continue;
        }
        let contains = lower.contains(&target) || target.contains(&lower);
        if contains || levenshtein(&target, &lower) <= MAX_SUGGESTION_DISTANCE {
            found.push(slug.to_string());
            if found.len() == MAX_SUGGESTIONS {
                break;
            }
        }
    }
    found
}

/// Edit distance (insertions, deletions, substitutions) over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
