//! Markdown format implementation for ATX headings.
//!
//! Headings are `#` to `######` followed by whitespace and a title. Fenced code blocks open
//! on three or more backticks or tildes; this is intentionally narrower than CommonMark.

use crate::formats::Format;
use regex::Regex;
use std::sync::LazyLock;

static ATX_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.+)$").expect("ATX heading pattern is valid")
});

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(`{3,}|~{3,})").expect("code fence pattern is valid"));

/// Line rules for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn heading(&self, line: &str) -> Option<(usize, String)> {
        let captures = ATX_HEADING_RE.captures(line)?;
        let level = captures.get(1)?.as_str().len();
        let title = strip_closing_sequence(captures.get(2)?.as_str());
        Some((level, title))
    }

    fn fence_marker(&self, line: &str) -> Option<char> {
        CODE_FENCE_RE
            .captures(line)
            .and_then(|captures| captures.get(1))
            .and_then(|marker| marker.as_str().chars().next())
    }
}

/// Drop an optional closing `#` run (`## Title ##`) and surrounding whitespace.
///
/// The run only counts as a closing sequence when whitespace separates it from the title,
/// so `## C#` keeps its `#`.
fn strip_closing_sequence(raw: &str) -> String {
    let trimmed = raw.trim();
    let without = trimmed.trim_end_matches('#');
    if without.len() == trimmed.len() {
        return trimmed.to_string();
    }
    if without.is_empty() || without.ends_with(char::is_whitespace) {
        without.trim().to_string()
    } else {
        trimmed.to_string()
    }
}
