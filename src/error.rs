//! Failure modes of view and edit operations.
//!
//! Every variant renders to an actionable message: the engine's public entry points return
//! these as text rather than propagating them.

use std::io;
use std::path::PathBuf;

/// Reasons a view or edit could not be carried out.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// The scope string itself is malformed.
    #[error("Invalid scope '{0}': expected <file>[::<heading>...]")]
    InvalidScope(String),

    /// The heading path resolves to nothing.
    #[error("Scope not found: {scope}")]
    ScopeNotFound {
        /// Scope as written by the caller.
        scope: String,
    },

    /// The heading path resolves to more than one section.
    #[error(
        "Ambiguous reference '{reference}' matches {count} sections:\n{listing}\nUse a full path to pick one.",
        count = .candidates.len(),
        listing = .candidates.join("\n")
    )]
    AmbiguousReference {
        /// Reference as written by the caller.
        reference: String,
        /// Full `::` path of every matching section.
        candidates: Vec<String>,
    },

    /// A quoted anchor pattern does not occur in the searched range.
    #[error("Pattern not found in {scope}: {pattern:?}")]
    PatternNotFound {
        /// Pattern with its quotes removed.
        pattern: String,
        /// Scope that was searched.
        scope: String,
    },

    /// A file-level anchor was combined with a section target.
    #[error("{anchor} can only be used with a whole-file scope, not {scope}")]
    InvalidCombination {
        /// The sentinel anchor.
        anchor: String,
        /// The section target it was combined with.
        scope: String,
    },

    /// The insertion anchor exists but lies outside the target section.
    #[error("Anchor '{anchor}' lies outside the target scope {scope}")]
    AnchorOutOfScope {
        /// Anchor as written by the caller.
        anchor: String,
        /// The target section.
        scope: String,
    },

    /// The operation would remove more lines than allowed without confirmation.
    #[error(
        "Refusing to delete {lines} lines (limit {limit}). Pass delete_a_lot to confirm."
    )]
    UnsafeDeletion {
        /// Lines the operation would remove.
        lines: usize,
        /// Configured limit.
        limit: usize,
    },

    /// The document could not be read or written.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },

    /// Structured output could not be rendered.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
