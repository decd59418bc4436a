//! Turns flat lines into an ordered list of sections.
//!
//! Parsing is a single linear scan: fence state is tracked independently of heading detection,
//! and section end boundaries are closed off with a level stack as each new heading arrives.

use crate::formats::Format;
use crate::section::Section;

/// Parse `lines` into sections in document order.
///
/// A heading's `end_line` is the line before the next heading of the same or a shallower level,
/// or the last line of the document if there is none. Lines inside a fenced block are never
/// classified as headings.
pub fn extract_sections<S: AsRef<str>>(lines: &[S], format: &dyn Format) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut fence: Option<char> = None;

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();

        if let Some(marker) = format.fence_marker(line) {
            match fence {
                None => {
                    fence = Some(marker);
                    continue;
                }
                Some(open_marker) if open_marker == marker => {
                    fence = None;
                    continue;
                }
                Some(_) => {}
            }
        }
        if fence.is_some() {
            continue;
        }

        let Some((level, title)) = format.heading(line) else {
            continue;
        };

        while let Some(&top) = open.last() {
            if sections[top].level < level {
                break;
            }
            sections[top].end_line = i - 1;
            open.pop();
        }

        open.push(sections.len());
        sections.push(Section {
            title,
            level,
            start_line: i,
            end_line: i,
        });
    }

    let last_line = lines.len().saturating_sub(1);
    for index in open {
        sections[index].end_line = last_line;
    }

    tracing::trace!(lines = lines.len(), headings = sections.len(), "extracted sections");
    sections
}

/// Collect the distinct heading titles that appear in `lines`.
pub fn titles<S: AsRef<str>>(lines: &[S], format: &dyn Format) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for section in extract_sections(lines, format) {
        if !titles.contains(&section.title) {
            titles.push(section.title);
        }
    }
    titles
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
