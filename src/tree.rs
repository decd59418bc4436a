//! Resolves `::`-separated heading paths against a parsed section list.
//!
//! The hierarchy is an arena index built per call: sections are borrowed and addressed by
//! position, and parent/child edges are plain index vectors. The same section list can back
//! any number of independent trees and lookups without side effects.

use crate::section::Section;
use serde::Serialize;

/// Outcome of resolving a heading path.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exactly one section matches.
    Unique(&'a Section),
    /// Several sections match; each is given as its full root-to-node title path.
    Ambiguous(Vec<Vec<String>>),
    /// Nothing matches.
    NotFound,
}

#[derive(Debug, Serialize)]
/// One row of a document outline.
pub struct OutlineEntry {
    /// Titles from the root heading down to this one.
    pub path: Vec<String>,
    /// Heading level.
    pub level: usize,
    /// 1-based first line of the section.
    pub line_start: usize,
    /// 1-based last line of the section.
    pub line_end: usize,
}

/// Call-scoped parent/child index over a flat section list.
pub struct SectionTree<'a> {
    sections: &'a [Section],
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl<'a> SectionTree<'a> {
    #[must_use]
    /// Build the hierarchy with a level stack over `sections` in document order.
    pub fn build(sections: &'a [Section]) -> Self {
        let mut parents = vec![None; sections.len()];
        let mut children = vec![Vec::new(); sections.len()];
        let mut roots = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        for (index, section) in sections.iter().enumerate() {
            while stack
                .last()
                .is_some_and(|&top| sections[top].level >= section.level)
            {
                stack.pop();
            }
            match stack.last() {
                Some(&parent) => {
                    parents[index] = Some(parent);
                    children[parent].push(index);
                }
                None => roots.push(index),
            }
            stack.push(index);
        }

        Self {
            sections,
            parents,
            children,
            roots,
        }
    }

    #[must_use]
    /// Indices of top-level sections.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    /// Indices of the sections directly nested under `index`.
    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    #[must_use]
    /// Index of the section containing `index`, if any.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents[index]
    }

    #[must_use]
    /// Titles from the root down to the section at `index`.
    pub fn full_path(&self, index: usize) -> Vec<String> {
        let mut path = vec![self.sections[index].title.clone()];
        let mut current = self.parent(index);
        while let Some(parent) = current {
            path.push(self.sections[parent].title.clone());
            current = self.parent(parent);
        }
        path.reverse();
        path
    }

    /// Resolve `path` to a unique section, an ambiguity, or nothing.
    ///
    /// The first title may match a heading at any depth; every following title must match an
    /// immediate child of the previous match. All matches are enumerated before deciding.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Resolution<'a> {
        let Some((first, rest)) = path.split_first() else {
            return Resolution::NotFound;
        };

        let mut matches = Vec::new();
        for (index, section) in self.sections.iter().enumerate() {
            if section.title == first.as_ref() {
                self.descend(index, rest, &mut matches);
            }
        }

        match matches.as_slice() {
            [] => Resolution::NotFound,
            [only] => Resolution::Unique(&self.sections[*only]),
            _ => Resolution::Ambiguous(
                matches.iter().map(|&index| self.full_path(index)).collect(),
            ),
        }
    }

    fn descend<S: AsRef<str>>(&self, index: usize, rest: &[S], matches: &mut Vec<usize>) {
        let Some((next, remaining)) = rest.split_first() else {
            matches.push(index);
            return;
        };
        for &child in self.children(index) {
            if self.sections[child].title == next.as_ref() {
                self.descend(child, remaining, matches);
            }
        }
    }

    #[must_use]
    /// Every section with its full path and 1-based line span, in document order.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::with_capacity(self.sections.len());
        for &root in self.roots() {
            self.walk(root, &mut entries);
        }
        entries
    }

    fn walk(&self, index: usize, entries: &mut Vec<OutlineEntry>) {
        let section = &self.sections[index];
        entries.push(OutlineEntry {
            path: self.full_path(index),
            level: section.level,
            line_start: section.start_line + 1,
            line_end: section.end_line + 1,
        });
        for &child in self.children(index) {
            self.walk(child, entries);
        }
    }
}

#[cfg(test)]
#[path = "tests/tree.rs"]
mod tests;
