//! Text helpers shared by the CLI, the server and the page-side caller.
//!
//! These cover the small amount of text shaping that happens around a
//! translation: deriving the cache key for a problem page, normalizing the
//! scraped description, and cleaning up what the model sends back.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound on the characters kept by [`sanitize_text`].
pub const MAX_SANITIZED_CHARS: usize = 3000;

lazy_static! {
    static ref PROBLEM_SLUG: Regex = Regex::new(r"/problems/([^/?#]+)").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref PREAMBLE: Regex = Regex::new(r"(?is)^.*?PROBLEM DESCRIPTION:?\s*").unwrap();
}

/// Derives the stable problem identifier used as cache key.
///
/// Prefers the slug in a `/problems/<slug>/` path, then the part of the page
/// title before the first `" - "`, and finally `"unknown"`.
pub fn problem_id(url_or_path: &str, title: Option<&str>) -> String {
    if let Some(caps) = PROBLEM_SLUG.captures(url_or_path) {
        return caps[1].to_string();
    }

    title
        .and_then(|t| t.split(" - ").next())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Collapses whitespace runs, trims, and caps the text at [`MAX_SANITIZED_CHARS`].
pub fn sanitize_text(text: &str) -> String {
    WHITESPACE
        .replace_all(text, " ")
        .trim()
        .chars()
        .take(MAX_SANITIZED_CHARS)
        .collect()
}

/// Joins the description and optional examples the way the page script sends them.
pub fn join_sections(description: &str, examples: Option<&str>) -> String {
    match examples {
        Some(ex) if !ex.is_empty() => format!("{}\n\n{}", description, ex),
        _ => description.to_string(),
    }
}

/// Builds the sectioned plain-text request used for non-HTML input.
pub fn format_translation_request(description: Option<&str>, examples: Option<&str>) -> String {
    let mut content = String::from(
        "Translate the following LeetCode problem to Hinglish (Hindi written in Roman script). \
         Keep code, variable names, and technical terms unchanged:\n\n",
    );

    if let Some(desc) = description.filter(|d| !d.is_empty()) {
        content.push_str("PROBLEM DESCRIPTION:\n");
        content.push_str(desc);
        content.push_str("\n\n");
    }

    if let Some(ex) = examples.filter(|e| !e.is_empty()) {
        content.push_str("EXAMPLES:\n");
        content.push_str(ex);
    }

    content
}

/// Strips any model preamble up to a leading `PROBLEM DESCRIPTION:` marker.
pub fn parse_translated_content(translated: &str) -> String {
    PREAMBLE.replace(translated, "").trim().to_string()
}
