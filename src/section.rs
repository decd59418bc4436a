//! Section representation for heading-organised documents.
//!
//! A section is one heading occurrence together with every line that belongs to it: its own
//! body and the bodies of all its descendant headings. Sections only carry line coordinates
//! into the exact text snapshot they were parsed from; any edit to that text invalidates them.
//! Parent/child relationships live in [`crate::tree`], never on the record.

#[derive(Clone, Debug, PartialEq, Eq)]
/// One heading and the line span it governs.
pub struct Section {
    /// Heading text without markup symbols or a closing `#` sequence.
    pub title: String,
    /// Number of leading `#` characters (1 to 6).
    pub level: usize,
    /// Zero-based line of the heading itself.
    pub start_line: usize,
    /// Zero-based last line of the section, descendants included.
    pub end_line: usize,
}

impl Section {
    #[must_use]
    /// First line of body content, directly after the heading line.
    pub fn content_start(&self) -> usize {
        self.start_line + 1
    }

    #[must_use]
    /// Number of lines spanned, heading line included.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    #[must_use]
    /// Whether `line` falls inside this section's span.
    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }

    #[must_use]
    /// Whether `other` lies entirely within this section's span (a section contains itself).
    pub fn contains(&self, other: &Section) -> bool {
        other.start_line >= self.start_line && other.end_line <= self.end_line
    }

    #[must_use]
    /// Whether `other` is nested strictly below this section's heading.
    pub fn encloses(&self, other: &Section) -> bool {
        other.start_line > self.start_line && other.end_line <= self.end_line
    }
}
