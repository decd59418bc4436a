//! The engine sequences parsing, path resolution, pruning and splicing for view and edit calls.
//!
//! Each call works on a fresh snapshot of the file. Line numbers are only trusted against the
//! snapshot they were computed from: after any mutation (pruning duplicates, say) the document
//! is re-parsed and every path is resolved again before the next splice. The public entry
//! points never fail; errors come back as descriptive text for the calling agent.

use crate::config::Config;
use crate::document::Document;
use crate::edit_plan::{self, Edit, EditPlan};
use crate::error::EditError;
use crate::formats::markdown::MarkdownFormat;
use crate::input;
use crate::prune;
use crate::scope::{Anchor, Scope};
use crate::section::Section;
use crate::tree::{Resolution, SectionTree};
use std::io;
use std::path::{Path, PathBuf};

/// Structural view/edit operations over markdown files.
pub struct Engine {
    config: Config,
    format: MarkdownFormat,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    #[must_use]
    /// Create an engine with the given limits.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            format: MarkdownFormat,
        }
    }

    #[must_use]
    /// Show the file or section addressed by `scope`, truncated to `max_lines` if given.
    pub fn view(&self, scope: &str, max_lines: Option<usize>) -> String {
        let result = Scope::parse(scope).and_then(|scope| {
            let doc = read(&scope.file)?;
            self.view_document(&doc, &scope, max_lines)
        });
        result.unwrap_or_else(|e| report(&e))
    }

    #[must_use]
    /// Replace, delete, or insert into the file or section addressed by `scope`.
    ///
    /// Without `coscope_with`, blank `content` deletes the scope and anything else replaces it.
    /// With `coscope_with`, `content` is inserted relative to that anchor.
    pub fn edit(
        &self,
        scope: &str,
        content: &str,
        coscope_with: Option<&str>,
        delete_a_lot: bool,
    ) -> String {
        self.try_edit(scope, content, coscope_with, delete_a_lot)
            .unwrap_or_else(|e| report(&e))
    }

    #[must_use]
    /// List every heading in `file` with its full path and line span, as text or JSON.
    pub fn outline(&self, file: &str, json: bool) -> String {
        self.try_outline(file, json).unwrap_or_else(|e| report(&e))
    }

    /// Render the addressed part of an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns an error if the heading path is missing or ambiguous.
    pub fn view_document(
        &self,
        doc: &Document,
        scope: &Scope,
        max_lines: Option<usize>,
    ) -> Result<String, EditError> {
        let text = if scope.is_file_level() {
            doc.lines.join("\n")
        } else {
            let sections = input::extract_sections(&doc.lines, &self.format);
            let section = self.locate(&sections, scope, &scope.path)?;
            edit_plan::extract(&doc.lines, &section)
        };
        Ok(truncate(
            &text,
            max_lines.unwrap_or(self.config.view_max_lines),
        ))
    }

    /// Apply an edit to an in-memory document and describe what changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a path or pattern cannot be resolved, the anchor is not allowed for
    /// the scope, or the edit would remove too many lines without `delete_a_lot`.
    pub fn edit_document(
        &self,
        doc: &mut Document,
        scope: &Scope,
        content: &str,
        anchor: Option<&Anchor>,
        delete_a_lot: bool,
    ) -> Result<String, EditError> {
        match anchor {
            Some(anchor) => self.insert(doc, scope, content, anchor),
            None if content.trim().is_empty() => self.delete(doc, scope, delete_a_lot),
            None => self.replace(doc, scope, content, delete_a_lot),
        }
    }

    fn try_edit(
        &self,
        scope: &str,
        content: &str,
        coscope_with: Option<&str>,
        delete_a_lot: bool,
    ) -> Result<String, EditError> {
        let scope = Scope::parse(scope)?;
        let path = Path::new(&scope.file);
        let anchor = coscope_with.map(|raw| Anchor::parse(raw, &scope.file));

        let mut doc = match Document::read(path) {
            Ok(doc) => doc,
            Err(e)
                if e.kind() == io::ErrorKind::NotFound
                    && scope.is_file_level()
                    && !content.trim().is_empty() =>
            {
                tracing::info!(file = %scope.file, "creating new document");
                Document::default()
            }
            Err(source) => {
                return Err(EditError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let message = self.edit_document(&mut doc, &scope, content, anchor.as_ref(), delete_a_lot)?;
        doc.write(path).map_err(|source| EditError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(file = %scope.file, lines = doc.lines.len(), "wrote document");
        Ok(message)
    }

    fn try_outline(&self, file: &str, json: bool) -> Result<String, EditError> {
        let scope = Scope::parse(file)?;
        let doc = read(&scope.file)?;
        let sections = input::extract_sections(&doc.lines, &self.format);
        let entries = SectionTree::build(&sections).outline();

        if json {
            return Ok(serde_json::to_string_pretty(&entries)?);
        }
        if entries.is_empty() {
            return Ok(format!("No headings in {}", scope.file));
        }
        Ok(entries
            .iter()
            .map(|entry| {
                format!(
                    "{}{} (lines {}-{})",
                    "  ".repeat(entry.path.len() - 1),
                    scope.qualify(&entry.path),
                    entry.line_start,
                    entry.line_end
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn delete(
        &self,
        doc: &mut Document,
        scope: &Scope,
        delete_a_lot: bool,
    ) -> Result<String, EditError> {
        if scope.is_file_level() {
            let removed = doc.lines.len();
            self.check_deletion(removed, delete_a_lot)?;
            doc.lines.clear();
            return Ok(format!("Deleted all {removed} lines of {scope}"));
        }

        let sections = input::extract_sections(&doc.lines, &self.format);
        let section = self.locate(&sections, scope, &scope.path)?;
        let edit = edit_plan::delete(&section);
        self.check_deletion(edit.net_removed(), delete_a_lot)?;
        edit.apply(&mut doc.lines);
        Ok(format!("Deleted {scope} ({} lines)", edit.removed()))
    }

    fn replace(
        &self,
        doc: &mut Document,
        scope: &Scope,
        content: &str,
        delete_a_lot: bool,
    ) -> Result<String, EditError> {
        let plan = if scope.is_file_level() {
            EditPlan {
                edits: vec![Edit {
                    start: 0,
                    end: doc.lines.len(),
                    replacement: edit_plan::content_lines(content),
                }],
            }
        } else {
            let sections = input::extract_sections(&doc.lines, &self.format);
            let section = self.locate(&sections, scope, &scope.path)?;
            edit_plan::replace(&doc.lines, &section, content, &self.format)
        };

        self.check_deletion(plan.net_removed(), delete_a_lot)?;
        let (removed, inserted) = (plan.removed(), plan.inserted());
        plan.apply(&mut doc.lines);
        Ok(format!("Replaced {scope} ({removed} lines -> {inserted} lines)"))
    }

    fn insert(
        &self,
        doc: &mut Document,
        scope: &Scope,
        content: &str,
        anchor: &Anchor,
    ) -> Result<String, EditError> {
        let (edit, position) = match anchor {
            Anchor::FileStart | Anchor::FileEnd => {
                if !scope.is_file_level() {
                    return Err(EditError::InvalidCombination {
                        anchor: anchor.to_string(),
                        scope: scope.to_string(),
                    });
                }
                self.prune(doc, content, None, None);
                if *anchor == Anchor::FileStart {
                    (edit_plan::insert_at_start(content), "at the start".to_string())
                } else {
                    (
                        edit_plan::insert_at_end(&doc.lines, content),
                        "at the end".to_string(),
                    )
                }
            }
            Anchor::Pattern(pattern) => {
                let target = self.locate_target(doc, scope)?;
                self.find_pattern(doc, scope, target.as_ref(), pattern)?;
                self.prune(doc, content, target.as_ref(), None);

                let target = self.locate_target(doc, scope)?;
                let line = self.find_pattern(doc, scope, target.as_ref(), pattern)?;
                (
                    edit_plan::insert_after_line(line, content),
                    format!("after {anchor}"),
                )
            }
            Anchor::Heading(path) => {
                let (target, found) = self.locate_anchor(doc, scope, path, anchor)?;
                self.prune(doc, content, target.as_ref(), Some(&found));

                let (_, found) = self.locate_anchor(doc, scope, path, anchor)?;
                (
                    edit_plan::insert_after(&found, content),
                    format!("after {}", scope.qualify(path)),
                )
            }
        };

        let inserted = edit.replacement.len();
        edit.apply(&mut doc.lines);
        Ok(format!("Inserted {inserted} lines into {scope} {position}"))
    }

    fn prune(
        &self,
        doc: &mut Document,
        content: &str,
        scope: Option<&Section>,
        protect: Option<&Section>,
    ) {
        let plan = prune::prune_duplicates(&doc.lines, content, scope, protect, &self.format);
        if !plan.edits.is_empty() {
            tracing::info!(
                sections = plan.edits.len(),
                lines = plan.removed(),
                "pruned duplicate headings"
            );
        }
        plan.apply(&mut doc.lines);
    }

    fn locate_target(&self, doc: &Document, scope: &Scope) -> Result<Option<Section>, EditError> {
        if scope.is_file_level() {
            return Ok(None);
        }
        let sections = input::extract_sections(&doc.lines, &self.format);
        self.locate(&sections, scope, &scope.path).map(Some)
    }

    fn locate_anchor(
        &self,
        doc: &Document,
        scope: &Scope,
        path: &[String],
        anchor: &Anchor,
    ) -> Result<(Option<Section>, Section), EditError> {
        let target = self.locate_target(doc, scope)?;
        let sections = input::extract_sections(&doc.lines, &self.format);
        let found = self.locate(&sections, scope, path)?;

        if target.as_ref().is_some_and(|target| !target.contains(&found)) {
            return Err(EditError::AnchorOutOfScope {
                anchor: anchor.to_string(),
                scope: scope.to_string(),
            });
        }
        Ok((target, found))
    }

    fn find_pattern(
        &self,
        doc: &Document,
        scope: &Scope,
        target: Option<&Section>,
        pattern: &str,
    ) -> Result<usize, EditError> {
        edit_plan::find_pattern_in_section(&doc.lines, target, pattern).ok_or_else(|| {
            EditError::PatternNotFound {
                pattern: pattern.to_string(),
                scope: scope.to_string(),
            }
        })
    }

    fn locate(
        &self,
        sections: &[Section],
        scope: &Scope,
        path: &[String],
    ) -> Result<Section, EditError> {
        let tree = SectionTree::build(sections);
        match tree.resolve(path) {
            Resolution::Unique(section) => {
                tracing::debug!(
                    path = %path.join("::"),
                    start = section.start_line,
                    end = section.end_line,
                    "resolved section"
                );
                Ok(section.clone())
            }
            Resolution::Ambiguous(paths) => Err(EditError::AmbiguousReference {
                reference: scope.qualify(path),
                candidates: paths.iter().map(|titles| scope.qualify(titles)).collect(),
            }),
            Resolution::NotFound => Err(EditError::ScopeNotFound {
                scope: scope.qualify(path),
            }),
        }
    }

    fn check_deletion(&self, lines: usize, delete_a_lot: bool) -> Result<(), EditError> {
        let limit = self.config.max_delete_lines;
        if lines > limit && !delete_a_lot {
            tracing::warn!(lines, limit, "refusing large deletion");
            return Err(EditError::UnsafeDeletion { lines, limit });
        }
        Ok(())
    }
}

fn read(file: &str) -> Result<Document, EditError> {
    Document::read(Path::new(file)).map_err(|source| EditError::Io {
        path: PathBuf::from(file),
        source,
    })
}

fn truncate(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if max_lines == 0 || lines.len() <= max_lines {
        return text.to_string();
    }
    format!(
        "{}\n... ({} more lines)",
        lines[..max_lines].join("\n"),
        lines.len() - max_lines
    )
}

fn report(error: &EditError) -> String {
    format!("Error: {error}")
}

#[cfg(test)]
#[path = "tests/engine.rs"]
mod tests;
