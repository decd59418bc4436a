//! Whole-file snapshots: read into lines, write back as a full replacement.
//!
//! A byte-order mark is dropped on read. The line ending style and the presence of a final
//! newline are remembered so that a write reproduces them.

use std::fs;
use std::io;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Line terminator used when writing a document back.
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    #[must_use]
    /// The terminator as text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// In-memory snapshot of a text file.
pub struct Document {
    /// Lines without terminators.
    pub lines: Vec<String>,
    /// Whether the file ended with a line terminator.
    pub trailing_newline: bool,
    /// Terminator detected in the file.
    pub line_ending: LineEnding,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: true,
            line_ending: LineEnding::Lf,
        }
    }
}

impl Document {
    #[must_use]
    /// Split `text` into a snapshot.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let line_ending = if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.ends_with('\n'),
            line_ending,
        }
    }

    #[must_use]
    /// Render the snapshot back to text.
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let eol = self.line_ending.as_str();
        let mut text = self.lines.join(eol);
        if self.trailing_newline {
            text.push_str(eol);
        }
        text
    }

    /// Read the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8.
    pub fn read(path: &Path) -> io::Result<Self> {
        fs::read_to_string(path).map(|text| Self::parse(&text))
    }

    /// Replace the file at `path` with this snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
