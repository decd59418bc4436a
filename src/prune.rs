//! Removes existing headings that incoming content is about to re-declare.
//!
//! Generated content often repeats a heading that already exists. Rather than ending up with
//! two copies, the older section (with its subtree) is dropped before the insertion happens.

use crate::edit_plan::{self, EditPlan};
use crate::formats::Format;
use crate::input;
use crate::section::Section;

/// Plan the removal of every section whose title also appears as a heading in `incoming`.
///
/// With a `scope`, only sections nested strictly inside it are candidates; without one, any
/// section in the document is. A section containing `protect` is never removed. Matches nested
/// inside another match are covered by the outer removal, so the plan never overlaps.
pub fn prune_duplicates<S: AsRef<str>>(
    lines: &[S],
    incoming: &str,
    scope: Option<&Section>,
    protect: Option<&Section>,
    format: &dyn Format,
) -> EditPlan {
    let incoming_lines = edit_plan::content_lines(incoming);
    let titles = input::titles(incoming_lines.as_slice(), format);
    if titles.is_empty() {
        return EditPlan::default();
    }

    let mut doomed: Vec<Section> = Vec::new();
    for section in input::extract_sections(lines, format) {
        if !titles.contains(&section.title) {
            continue;
        }
        if scope.is_some_and(|scope| !scope.encloses(&section)) {
            continue;
        }
        if protect.is_some_and(|anchor| section.contains(anchor)) {
            continue;
        }
        if doomed.iter().any(|outer| outer.contains(&section)) {
            continue;
        }
        tracing::debug!(title = %section.title, line = section.start_line, "pruning duplicate heading");
        doomed.push(section);
    }

    EditPlan {
        edits: doomed.iter().map(edit_plan::delete).collect(),
    }
}

#[cfg(test)]
#[path = "tests/prune.rs"]
mod tests;
