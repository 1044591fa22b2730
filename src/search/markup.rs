//! Markdown-to-plain-text pipeline for the `content` field of a search record.
//!
//! Stripping is a fixed sequence of named steps. Order matters:
//!
//! ```text
//! FencedCode → Headings → InlineCode → Emphasis → Links → Whitespace
//! ```
//!
//! - Fenced blocks go first so their contents never reach the other steps and
//!   are not merged into prose by whitespace collapsing.
//! - Links resolve to their visible text before line breaks collapse.
//!
//! Each step is a public function so it can be tested alone.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fenced-code pattern"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").expect("valid heading pattern"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid inline-code pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid link pattern"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("valid line-break pattern"));

/// One stage of [`strip_markup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripStep {
    FencedCode,
    Headings,
    InlineCode,
    Emphasis,
    Links,
    Whitespace,
}

impl StripStep {
    /// The steps in the order [`strip_markup`] applies them.
    pub const PIPELINE: [StripStep; 6] = [
        StripStep::FencedCode,
        StripStep::Headings,
        StripStep::InlineCode,
        StripStep::Emphasis,
        StripStep::Links,
        StripStep::Whitespace,
    ];

    pub fn apply(self, text: &str) -> String {
        match self {
            StripStep::FencedCode => strip_fenced_code(text),
            StripStep::Headings => strip_headings(text),
            StripStep::InlineCode => strip_inline_code(text),
            StripStep::Emphasis => strip_emphasis(text),
            StripStep::Links => resolve_links(text),
            StripStep::Whitespace => collapse_whitespace(text),
        }
    }
}

/// Remove ```` ``` ```` blocks including their contents.
pub fn strip_fenced_code(text: &str) -> String {
    FENCED_CODE.replace_all(text, "").into_owned()
}

/// Remove `#`-style heading markers at the start of a line.
///
/// A `#` elsewhere in a line (`C#`, `issue #4`) is left alone.
pub fn strip_headings(text: &str) -> String {
    HEADING.replace_all(text, "").into_owned()
}

/// Replace `` `code` `` with `code`.
pub fn strip_inline_code(text: &str) -> String {
    INLINE_CODE.replace_all(text, "$1").into_owned()
}

/// Replace `**bold**` and `*italic*` with their inner text.
pub fn strip_emphasis(text: &str) -> String {
    let unbolded = BOLD.replace_all(text, "$1");
    ITALIC.replace_all(&unbolded, "$1").into_owned()
}

/// Replace `[text](url)` and `![alt](src)` with the visible text.
pub fn resolve_links(text: &str) -> String {
    LINK.replace_all(text, "$1").into_owned()
}

/// Collapse each run of line breaks to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    LINE_BREAKS.replace_all(text, " ").trim().to_string()
}

/// Run the full pipeline.
pub fn strip_markup(markdown: &str) -> String {
    StripStep::PIPELINE
        .iter()
        .fold(markdown.to_string(), |text, step| step.apply(&text))
}
