//! Match highlighting for display strings.
//!
//! Every case-insensitive occurrence of the query is wrapped in markers. The
//! matched text keeps its original casing; the query is escaped, so `.`, `(`
//! and `$` match literally.
//!
//! [`highlight`] and [`highlight_with`] pass the text through untouched, so
//! their output is only HTML when the text already is. For raw field values
//! headed into HTML use [`highlight_html`], which finds matches on the raw
//! text and escapes each segment on its own; a query can never land inside
//! an entity such as `&amp;`.

use regex::{Captures, Regex, RegexBuilder};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Wrap matches of `query` in `<mark>` tags.
pub fn highlight(text: &str, query: &str) -> String {
    highlight_with(text, query, MARK_OPEN, MARK_CLOSE)
}

/// Wrap matches of `query` in custom markers (e.g. ANSI bold for terminals).
///
/// The query is trimmed; an empty query returns `text` unchanged.
pub fn highlight_with(text: &str, query: &str, open: &str, close: &str) -> String {
    let Some(pattern) = literal_pattern(query) else {
        return text.to_string();
    };
    pattern
        .replace_all(text, |caps: &Captures| format!("{open}{}{close}", &caps[0]))
        .into_owned()
}

/// HTML-escape raw `text` and wrap matches of `query` in `<mark>` tags.
///
/// Matching runs on the unescaped text, so `highlight_html("AT&T", "amp")`
/// is `AT&amp;T` with no marks.
pub fn highlight_html(text: &str, query: &str) -> String {
    let Some(pattern) = literal_pattern(query) else {
        return escape_html(text);
    };
    let mut html = String::with_capacity(text.len());
    let mut last = 0;
    for found in pattern.find_iter(text) {
        html.push_str(&escape_html(&text[last..found.start()]));
        html.push_str(MARK_OPEN);
        html.push_str(&escape_html(found.as_str()));
        html.push_str(MARK_CLOSE);
        last = found.end();
    }
    html.push_str(&escape_html(&text[last..]));
    html
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Case-insensitive literal pattern for the trimmed query, `None` when blank.
fn literal_pattern(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}
