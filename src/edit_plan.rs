//! The edit plan computes line splices for section-level reads and mutations.
//!
//! Every mutation is expressed as an [`Edit`]: a half-open line range and the lines that replace
//! it. Building the splice separately from applying it lets callers inspect how many lines an
//! operation would remove before committing to it.

use crate::formats::Format;
use crate::input;
use crate::prune;
use crate::section::Section;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Replace lines `start..end` with `replacement`.
pub struct Edit {
    /// First line of the splice (inclusive).
    pub start: usize,
    /// Final line of the splice (exclusive).
    pub end: usize,
    /// Lines written in place of the range.
    pub replacement: Vec<String>,
}

impl Edit {
    #[must_use]
    /// Number of existing lines the splice removes.
    pub fn removed(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    /// How many lines shorter the document becomes, or zero if it grows.
    pub fn net_removed(&self) -> usize {
        self.removed().saturating_sub(self.replacement.len())
    }

    /// Splice this edit into `lines`.
    pub fn apply(&self, lines: &mut Vec<String>) {
        lines.splice(self.start..self.end, self.replacement.iter().cloned());
    }
}

#[derive(Clone, Debug, Default)]
/// A batch of non-overlapping edits against one snapshot.
pub struct EditPlan {
    /// Individual splices, in any order.
    pub edits: Vec<Edit>,
}

impl EditPlan {
    #[must_use]
    /// Total lines removed by all edits.
    pub fn removed(&self) -> usize {
        self.edits.iter().map(Edit::removed).sum()
    }

    #[must_use]
    /// Total lines written by all edits.
    pub fn inserted(&self) -> usize {
        self.edits.iter().map(|edit| edit.replacement.len()).sum()
    }

    #[must_use]
    /// How many lines shorter the document becomes, or zero if it grows.
    pub fn net_removed(&self) -> usize {
        self.removed().saturating_sub(self.inserted())
    }

    /// Apply every edit, last-to-first, so earlier line indices stay valid.
    pub fn apply(mut self, lines: &mut Vec<String>) {
        self.edits.sort_by(|a, b| b.start.cmp(&a.start));
        for edit in &self.edits {
            edit.apply(lines);
        }
    }
}

fn last_non_blank<S: AsRef<str>>(lines: &[S], start: usize, end: usize) -> usize {
    (start..=end)
        .rev()
        .find(|&i| !lines[i].as_ref().trim().is_empty())
        .unwrap_or(start)
}

/// Split `content` into lines, dropping trailing blank lines.
#[must_use]
pub fn content_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Text of `section`: its heading through its last descendant, without trailing blank lines.
#[must_use]
pub fn extract<S: AsRef<str>>(lines: &[S], section: &Section) -> String {
    let end = last_non_blank(lines, section.start_line, section.end_line);
    lines[section.start_line..=end]
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Replace the section's own text with `content`.
///
/// The replaced range stops before the first nested heading, so subsections survive. Existing
/// subsections whose titles `content` re-declares are removed along with the blank lines before
/// them, which lets a section's own [`extract`] be written back unchanged. Trailing blank lines
/// of the range are kept as separators.
#[must_use]
pub fn replace<S: AsRef<str>>(
    lines: &[S],
    section: &Section,
    content: &str,
    format: &dyn Format,
) -> EditPlan {
    let own_end = input::extract_sections(lines, format)
        .iter()
        .find(|other| section.encloses(other))
        .map_or(section.end_line, |child| child.start_line - 1);

    let mut edits = vec![Edit {
        start: section.start_line,
        end: last_non_blank(lines, section.start_line, own_end) + 1,
        replacement: content_lines(content),
    }];
    let incoming = without_own_heading(content, section, format);
    let redeclared = prune::prune_duplicates(lines, incoming, Some(section), None, format);
    edits.extend(redeclared.edits.iter().map(|edit| detach(lines, edit)));
    EditPlan { edits }
}

/// `content` minus a leading heading that restates the section's own heading.
fn without_own_heading<'c>(content: &'c str, section: &Section, format: &dyn Format) -> &'c str {
    let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
    match format.heading(first.trim_end()) {
        Some((level, title)) if level == section.level && title == section.title => rest,
        _ => content,
    }
}

/// Shift a subtree deletion to take the blank lines above it and leave its trailing ones.
fn detach<S: AsRef<str>>(lines: &[S], edit: &Edit) -> Edit {
    let mut start = edit.start;
    while start > 0 && lines[start - 1].as_ref().trim().is_empty() {
        start -= 1;
    }
    Edit {
        start,
        end: last_non_blank(lines, edit.start, edit.end - 1) + 1,
        replacement: Vec::new(),
    }
}

#[must_use]
/// Remove the section and everything under it.
pub fn delete(section: &Section) -> Edit {
    Edit {
        start: section.start_line,
        end: section.end_line + 1,
        replacement: Vec::new(),
    }
}

#[must_use]
/// Insert `content` after the last line of the section's subtree.
pub fn insert_after(section: &Section, content: &str) -> Edit {
    insert_at(section.end_line + 1, content)
}

#[must_use]
/// Insert `content` directly after line `line`.
pub fn insert_after_line(line: usize, content: &str) -> Edit {
    insert_at(line + 1, content)
}

#[must_use]
/// Prepend `content` to the document.
pub fn insert_at_start(content: &str) -> Edit {
    insert_at(0, content)
}

#[must_use]
/// Append `content` to the document.
pub fn insert_at_end<S: AsRef<str>>(lines: &[S], content: &str) -> Edit {
    insert_at(lines.len(), content)
}

fn insert_at(at: usize, content: &str) -> Edit {
    Edit {
        start: at,
        end: at,
        replacement: content_lines(content),
    }
}

/// Find `pattern` within `section` (or the whole document) and return its last matched line.
///
/// A single-line pattern matches any line containing it. A multi-line pattern matches a run of
/// consecutive lines where each trimmed pattern line is contained in the corresponding line.
#[must_use]
pub fn find_pattern_in_section<S: AsRef<str>>(
    lines: &[S],
    section: Option<&Section>,
    pattern: &str,
) -> Option<usize> {
    let pattern_lines: Vec<&str> = pattern.lines().collect();
    if pattern_lines.is_empty() || lines.is_empty() {
        return None;
    }
    let (start, end) = section.map_or((0, lines.len() - 1), |s| (s.start_line, s.end_line));

    if let [single] = pattern_lines.as_slice() {
        let needle = single.trim();
        return (start..=end).find(|&i| {
            let line = lines[i].as_ref();
            line.contains(*single) || (!needle.is_empty() && line.contains(needle))
        });
    }

    let span = pattern_lines.len();
    let fits = |last: usize| section.map_or(last < lines.len(), |s| s.contains_line(last));
    (start..=end)
        .filter(|&first| fits(first + span - 1))
        .find(|&first| {
            pattern_lines
                .iter()
                .enumerate()
                .all(|(offset, wanted)| lines[first + offset].as_ref().contains(wanted.trim()))
        })
        .map(|first| first + span - 1)
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
