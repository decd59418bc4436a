//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over the line-level syntax of a
//! heading-organised document: which lines are headings, and which lines open or close a
//! verbatim block inside which headings must not be recognised.

pub mod markdown;

/// Line classification rules for one document syntax.
pub trait Format {
    /// Classify `line` as a heading, returning its level and normalised title.
    fn heading(&self, line: &str) -> Option<(usize, String)>;

    /// Return the marker character if `line` is a fence delimiter.
    fn fence_marker(&self, line: &str) -> Option<char>;
}
