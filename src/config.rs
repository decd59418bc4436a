//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find an mdscope.toml, and if present we load settings from there.
//! This provides the deletion safety limit and the default view length.

use facet::Facet;
use std::fs;

/// Largest number of lines an edit may remove without explicit confirmation.
pub const DEFAULT_MAX_DELETE_LINES: usize = 100;

/// Lines `view` shows before truncating when nothing is configured; 0 shows everything.
pub const DEFAULT_VIEW_MAX_LINES: usize = 0;

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from mdscope.toml or falling back to defaults.
pub struct Config {
    #[facet(default = DEFAULT_MAX_DELETE_LINES)]
    /// Deletions larger than this many lines need `delete_a_lot`.
    pub max_delete_lines: usize,
    #[facet(default = DEFAULT_VIEW_MAX_LINES)]
    /// Lines shown by `view` before truncating; 0 shows everything.
    pub view_max_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_delete_lines: DEFAULT_MAX_DELETE_LINES,
            view_max_lines: DEFAULT_VIEW_MAX_LINES,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from mdscope.toml if present and valid.
    pub fn load() -> Self {
        match fs::read_to_string("mdscope.toml") {
            Ok(contents) => Self::from_toml(&contents),
            Err(_) => Self::default(),
        }
    }

    #[must_use]
    /// Parse configuration text, falling back to defaults if it is malformed.
    pub fn from_toml(contents: &str) -> Self {
        match facet_toml::from_str::<Self>(contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring invalid mdscope.toml: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
