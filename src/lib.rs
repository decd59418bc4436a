//! A structural editor for heading-organised markdown documents.
//!
//! mdscope addresses a document by a path of heading titles (`file::Heading::Subheading`) and
//! views, replaces, inserts into, or deletes that section without the caller re-parsing the
//! document. Ambiguous paths are reported with every candidate rather than guessed.
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod document;
pub mod edit_plan;
pub mod engine;
pub mod error;
pub mod formats;
pub mod input;
pub mod prune;
pub mod scope;
pub mod section;
pub mod telemetry;
pub mod tree;
