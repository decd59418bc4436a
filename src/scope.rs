//! The `file::Heading::Subheading` surface syntax and insertion anchors.

use crate::error::EditError;
use std::fmt;

/// Separator between the file and each heading title.
pub const SEPARATOR: &str = "::";
/// Anchor token for inserting at the top of the file.
pub const FILE_START: &str = "__FILE_START__";
/// Anchor token for inserting at the bottom of the file.
pub const FILE_END: &str = "__FILE_END__";

#[derive(Clone, Debug, PartialEq, Eq)]
/// A file plus an optional heading path inside it.
pub struct Scope {
    /// File path as given.
    pub file: String,
    /// Heading titles from outermost to innermost; empty for the whole file.
    pub path: Vec<String>,
}

impl Scope {
    /// Parse `file::A::B`. Segments are trimmed and empty segments dropped.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidScope`] if the file part is empty.
    pub fn parse(raw: &str) -> Result<Self, EditError> {
        let mut segments = raw.split(SEPARATOR).map(str::trim);
        let file = segments.next().unwrap_or_default();
        if file.is_empty() {
            return Err(EditError::InvalidScope(raw.to_string()));
        }
        Ok(Self {
            file: file.to_string(),
            path: segments
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    #[must_use]
    /// Whether the scope addresses the whole file.
    pub fn is_file_level(&self) -> bool {
        self.path.is_empty()
    }

    #[must_use]
    /// Render a heading path inside this scope's file, e.g. for ambiguity listings.
    pub fn qualify(&self, titles: &[String]) -> String {
        std::iter::once(self.file.as_str())
            .chain(titles.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualify(&self.path))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where new content goes relative to the existing document.
pub enum Anchor {
    /// Before the first line.
    FileStart,
    /// After the last line.
    FileEnd,
    /// After the last line of the first occurrence of a literal pattern.
    Pattern(String),
    /// After the full subtree of a heading, addressed by path from the document root.
    Heading(Vec<String>),
}

impl Anchor {
    #[must_use]
    /// Parse a `coscope_with` value. A leading segment equal to `file` is ignored.
    pub fn parse(raw: &str, file: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            FILE_START => return Self::FileStart,
            FILE_END => return Self::FileEnd,
            _ => {}
        }
        if let Some(pattern) = unquote(trimmed) {
            return Self::Pattern(pattern.to_string());
        }

        let mut path: Vec<String> = trimmed
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if path.len() > 1 && path[0] == file {
            path.remove(0);
        }
        Self::Heading(path)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileStart => f.write_str(FILE_START),
            Self::FileEnd => f.write_str(FILE_END),
            Self::Pattern(pattern) => write!(f, "{pattern:?}"),
            Self::Heading(path) => f.write_str(&path.join(SEPARATOR)),
        }
    }
}

fn unquote(raw: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        raw.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

#[cfg(test)]
#[path = "tests/scope.rs"]
mod tests;
