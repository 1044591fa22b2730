//! Slug rules shared by the scanner, the validator, and page generation.
//!
//! Term slugs come from front matter or the file stem and are used verbatim
//! in URLs, so they are checked rather than rewritten. Category slugs are
//! derived from display labels (`"Web Development"` → `web-development`)
//! because categories are free text in front matter.

/// Characters allowed in a term slug besides ASCII letters and digits.
const SLUG_PUNCTUATION: &[char] = &['-', '_', '.'];

/// Whether `slug` is non-empty and URL-safe without escaping.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SLUG_PUNCTUATION.contains(&c))
}

/// Slug for an entry file: the file stem with any `.md`/`.mdx` extension
/// already removed by the caller, trimmed.
///
/// - `"api"` → `"api"`
/// - `" rest-api "` → `"rest-api"`
pub fn slug_from_stem(stem: &str) -> String {
    stem.trim().to_string()
}

/// Convert a display label to a URL slug.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single dash, and trims leading/trailing dashes:
/// - `"Web Development"` → `"web-development"`
/// - `"C/C++ & Systems"` → `"c-c-systems"`
/// - `"Node.js"` → `"node-js"`
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Site-relative URL path of a category page.
pub fn category_path(category: &str) -> String {
    format!("/category/{}/", slugify(category))
}
