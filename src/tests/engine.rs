use super::Engine;
use crate::config::Config;
use crate::document::Document;
use crate::error::EditError;
use crate::scope::{Anchor, Scope};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const SCENARIO: &str = "# T\n\n## A\n\nfoo\n\n## B\n\nbar\n";
const GUIDE: &str = "# Guide\n\nIntro\n\n## Setup\n\nInstall it.\n\n### Linux\n\napt install\n\n## Usage\n\nRun it.\n";
const NOTES: &str =
    "# Notes\n\n## Section A\n\nold\n\n## Section B\n\n### Section A\n\nnested old\n";

fn temp_doc(text: &str) -> (NamedTempFile, String) {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{text}").unwrap();
    let path = file.path().to_string_lossy().to_string();
    (file, path)
}

fn scope(raw: &str) -> Scope {
    Scope::parse(raw).unwrap()
}

fn count_headings(text: &str, heading: &str) -> usize {
    text.lines().filter(|line| *line == heading).count()
}

/// A document whose `## Big` section spans exactly `size` lines.
fn big_section(size: usize) -> String {
    let mut text = String::from("# Keep\n## Big\n");
    for i in 0..size - 1 {
        writeln!(text, "line {i}").unwrap();
    }
    text.push_str("## Tail\nt\n");
    text
}

#[test]
fn test_view_and_replace_scenario() {
    let (_file, path) = temp_doc(SCENARIO);
    let engine = Engine::default();

    assert_eq!(engine.view(&format!("{path}::A"), None), "## A\n\nfoo");

    let result = engine.edit(&format!("{path}::A"), "## A\n\nbaz", None, false);
    assert!(result.starts_with("Replaced"), "unexpected result: {result}");

    assert_eq!(engine.view(&format!("{path}::A"), None), "## A\n\nbaz");
    assert_eq!(engine.view(&format!("{path}::B"), None), "## B\n\nbar");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# T\n\n## A\n\nbaz\n\n## B\n\nbar\n"
    );
}

#[test]
fn test_replace_with_extra_subsection_keeps_unmentioned_children() {
    let (_file, path) = temp_doc("# T\n\n## A\n\nold\n\n### Child\n\nkeep me\n");
    let engine = Engine::default();

    let result = engine.edit(
        &format!("{path}::A"),
        "## A\n\nnew\n\n### Extra\n\nx",
        None,
        false,
    );
    assert_eq!(result, format!("Replaced {path}::A (3 lines -> 7 lines)"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# T\n\n## A\n\nnew\n\n### Extra\n\nx\n\n### Child\n\nkeep me\n"
    );
}

#[test]
fn test_view_whole_file_and_truncation() {
    let (_file, path) = temp_doc(SCENARIO);
    let engine = Engine::default();

    assert_eq!(engine.view(&path, None), SCENARIO.trim_end());
    assert_eq!(engine.view(&path, Some(2)), "# T\n\n... (7 more lines)");
    assert_eq!(
        engine.view(&format!("{path}::T"), Some(3)),
        "# T\n\n## A\n... (6 more lines)"
    );
}

#[test]
fn test_view_uses_configured_limit() {
    let engine = Engine::new(Config {
        max_delete_lines: 100,
        view_max_lines: 1,
    });
    let doc = Document::parse(SCENARIO);

    assert_eq!(
        engine.view_document(&doc, &scope("doc.md::B"), None).unwrap(),
        "## B\n... (2 more lines)"
    );
    assert_eq!(
        engine
            .view_document(&doc, &scope("doc.md::B"), Some(10))
            .unwrap(),
        "## B\n\nbar"
    );
}

#[test]
fn test_round_trip_replace_is_idempotent() {
    let engine = Engine::default();
    for title in ["Guide", "Setup", "Linux", "Usage", "Guide::Setup::Linux"] {
        let target = scope(&format!("doc.md::{title}"));
        let mut doc = Document::parse(GUIDE);
        let before = engine.view_document(&doc, &target, None).unwrap();

        engine
            .edit_document(&mut doc, &target, &before, None, false)
            .unwrap();

        assert_eq!(engine.view_document(&doc, &target, None).unwrap(), before);
        assert_eq!(doc.render(), GUIDE, "round trip through {title} changed the file");
    }
}

#[test]
fn test_ambiguous_reference_lists_candidates() {
    let engine = Engine::default();
    let doc = Document::parse("# One\n## Dup\nx\n# Two\n## Dup\ny\n");

    let err = engine
        .view_document(&doc, &scope("doc.md::Dup"), None)
        .unwrap_err();
    match err {
        EditError::AmbiguousReference {
            reference,
            candidates,
        } => {
            assert_eq!(reference, "doc.md::Dup");
            assert_eq!(candidates, vec!["doc.md::One::Dup", "doc.md::Two::Dup"]);
        }
        other => panic!("expected ambiguity, got {other}"),
    }

    assert_eq!(
        engine
            .view_document(&doc, &scope("doc.md::Two::Dup"), None)
            .unwrap(),
        "## Dup\ny"
    );
}

#[test]
fn test_ambiguity_message_has_one_path_per_line() {
    let (_file, path) = temp_doc("# One\n## Dup\n# Two\n## Dup\n");
    let result = Engine::default().view(&format!("{path}::Dup"), None);

    assert!(result.starts_with("Error: Ambiguous reference"));
    assert!(result.contains(&format!("\n{path}::One::Dup\n")));
    assert!(result.contains(&format!("\n{path}::Two::Dup\n")));
}

#[test]
fn test_fenced_heading_is_never_matched() {
    let engine = Engine::default();
    let doc = Document::parse("# Real\n\n```\n# Real\n```\n\n~~~\n# Real\n~~~\n");

    let text = engine
        .view_document(&doc, &scope("doc.md::Real"), None)
        .unwrap();
    assert!(text.starts_with("# Real\n\n```"));
    assert!(text.ends_with("~~~"));
}

#[test]
fn test_delete_section() {
    let engine = Engine::default();
    let mut doc = Document::parse(GUIDE);

    let message = engine
        .edit_document(&mut doc, &scope("doc.md::Setup"), "  \n", None, false)
        .unwrap();

    assert_eq!(message, "Deleted doc.md::Setup (8 lines)");
    assert_eq!(doc.render(), "# Guide\n\nIntro\n\n## Usage\n\nRun it.\n");
}

#[test]
fn test_deletion_boundary() {
    let engine = Engine::default();
    let target = scope("doc.md::Big");

    let mut exactly = Document::parse(&big_section(100));
    assert!(engine
        .edit_document(&mut exactly, &target, "", None, false)
        .is_ok());
    assert_eq!(exactly.render(), "# Keep\n## Tail\nt\n");

    let mut over = Document::parse(&big_section(101));
    let err = engine
        .edit_document(&mut over, &target, "", None, false)
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::UnsafeDeletion {
            lines: 101,
            limit: 100
        }
    ));
    assert_eq!(over.render(), big_section(101), "refused edit must not touch the document");

    assert!(engine
        .edit_document(&mut over, &target, "", None, true)
        .is_ok());
    assert_eq!(over.render(), "# Keep\n## Tail\nt\n");
}

#[test]
fn test_deletion_limit_is_configurable() {
    let engine = Engine::new(Config {
        max_delete_lines: 5,
        view_max_lines: 0,
    });
    let mut doc = Document::parse(GUIDE);

    let err = engine
        .edit_document(&mut doc, &scope("doc.md::Setup"), "", None, false)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Refusing to delete 8 lines (limit 5). Pass delete_a_lot to confirm."
    );
}

#[test]
fn test_whole_file_replace_safety_compares_line_counts() {
    let engine = Engine::default();
    let original = big_section(150);
    let mut doc = Document::parse(&original);

    let err = engine
        .edit_document(&mut doc, &scope("doc.md"), "# Short\n", None, false)
        .unwrap_err();
    assert!(matches!(err, EditError::UnsafeDeletion { lines: 152, .. }));

    engine
        .edit_document(&mut doc, &scope("doc.md"), "# Short\n", None, true)
        .unwrap();
    assert_eq!(doc.render(), "# Short\n");
}

#[test]
fn test_whole_file_delete() {
    let (_file, path) = temp_doc(SCENARIO);
    let result = Engine::default().edit(&path, "", None, false);

    assert_eq!(result, format!("Deleted all 9 lines of {path}"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_trailing_newline_presence_is_preserved() {
    let engine = Engine::default();

    let (_with, with_path) = temp_doc(SCENARIO);
    let result = engine.edit(&format!("{with_path}::B"), "## B\n\nqux\n\n", None, false);
    assert!(result.starts_with("Replaced"), "unexpected result: {result}");
    assert!(fs::read_to_string(&with_path).unwrap().ends_with("qux\n"));

    let (_without, without_path) = temp_doc(SCENARIO.trim_end());
    let result = engine.edit(&format!("{without_path}::B"), "## B\n\nqux\n", None, false);
    assert!(result.starts_with("Replaced"), "unexpected result: {result}");
    assert!(fs::read_to_string(&without_path).unwrap().ends_with("qux"));
}

#[test]
fn test_crlf_is_preserved_through_edit() {
    let (_file, path) = temp_doc("# T\r\n\r\n## A\r\n\r\nfoo\r\n");
    let result = Engine::default().edit(&format!("{path}::A"), "## A\n\nbar", None, false);
    assert!(result.starts_with("Replaced"), "unexpected result: {result}");

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# T\r\n\r\n## A\r\n\r\nbar\r\n"
    );
}

#[test]
fn test_insert_after_pattern_within_scope() {
    let engine = Engine::default();
    let mut doc = Document::parse(GUIDE);

    let message = engine
        .edit_document(
            &mut doc,
            &scope("doc.md::Setup"),
            "sudo make install",
            Some(&Anchor::Pattern("apt install".to_string())),
            false,
        )
        .unwrap();

    assert_eq!(
        message,
        "Inserted 1 lines into doc.md::Setup after \"apt install\""
    );
    assert_eq!(doc.lines[10], "apt install");
    assert_eq!(doc.lines[11], "sudo make install");
}

#[test]
fn test_pattern_outside_scope_is_not_found() {
    let engine = Engine::default();
    let mut doc = Document::parse(GUIDE);

    let err = engine
        .edit_document(
            &mut doc,
            &scope("doc.md::Setup"),
            "x",
            Some(&Anchor::Pattern("Run it.".to_string())),
            false,
        )
        .unwrap_err();
    assert!(matches!(err, EditError::PatternNotFound { .. }));
    assert_eq!(doc.render(), GUIDE);
}

#[test]
fn test_insert_after_heading_anchor() {
    let (_file, path) = temp_doc(GUIDE);
    let result = Engine::default().edit(
        &path,
        "## Troubleshooting\n\nAsk.",
        Some(&format!("{path}::Setup")),
        false,
    );

    assert_eq!(
        result,
        format!("Inserted 3 lines into {path} after {path}::Setup")
    );
    let text = fs::read_to_string(&path).unwrap();
    let setup_end = text.find("apt install\n\n## Troubleshooting\n\nAsk.\n## Usage");
    assert!(setup_end.is_some(), "unexpected document:\n{text}");
}

#[test]
fn test_file_sentinels() {
    let engine = Engine::default();
    let mut doc = Document::parse(SCENARIO);

    engine
        .edit_document(
            &mut doc,
            &scope("doc.md"),
            "---\ntitle: x\n---",
            Some(&Anchor::FileStart),
            false,
        )
        .unwrap();
    engine
        .edit_document(&mut doc, &scope("doc.md"), "footer", Some(&Anchor::FileEnd), false)
        .unwrap();

    assert_eq!(doc.lines[0], "---");
    assert_eq!(doc.lines[3], "# T");
    assert_eq!(doc.lines.last().unwrap(), "footer");
}

#[test]
fn test_sentinel_with_section_scope_is_rejected() {
    let (_file, path) = temp_doc(SCENARIO);
    let result = Engine::default().edit(
        &format!("{path}::A"),
        "x",
        Some("__FILE_START__"),
        false,
    );

    assert_eq!(
        result,
        format!("Error: __FILE_START__ can only be used with a whole-file scope, not {path}::A")
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), SCENARIO);
}

#[test]
fn test_anchor_outside_target_is_rejected() {
    let engine = Engine::default();
    let mut doc = Document::parse(GUIDE);

    let err = engine
        .edit_document(
            &mut doc,
            &scope("doc.md::Setup"),
            "x",
            Some(&Anchor::Heading(vec!["Usage".to_string()])),
            false,
        )
        .unwrap_err();
    assert!(matches!(err, EditError::AnchorOutOfScope { .. }));
}

#[test]
fn test_scoped_insert_prunes_duplicate_inside_scope() {
    let engine = Engine::default();
    let mut doc = Document::parse(NOTES);

    engine
        .edit_document(
            &mut doc,
            &scope("doc.md::Section B"),
            "### Section A\n\nnested new",
            Some(&Anchor::Heading(vec!["Section B".to_string()])),
            false,
        )
        .unwrap();

    let text = doc.render();
    assert_eq!(count_headings(&text, "### Section A"), 1);
    assert_eq!(count_headings(&text, "## Section A"), 1);
    assert!(text.contains("nested new"));
    assert!(!text.contains("nested old"));
}

#[test]
fn test_unscoped_insert_prunes_duplicates_anywhere() {
    let engine = Engine::default();
    let mut doc = Document::parse(NOTES);

    engine
        .edit_document(
            &mut doc,
            &scope("doc.md"),
            "## Section A\n\nfresh",
            Some(&Anchor::FileEnd),
            false,
        )
        .unwrap();

    let text = doc.render();
    assert_eq!(count_headings(&text, "## Section A"), 1);
    assert_eq!(count_headings(&text, "### Section A"), 0);
    assert!(text.ends_with("## Section B\n\n## Section A\n\nfresh\n"));
    assert!(!text.contains("old"));
}

#[test]
fn test_insert_reresolves_anchor_after_pruning() {
    let engine = Engine::default();
    let mut doc = Document::parse(NOTES);

    engine
        .edit_document(
            &mut doc,
            &scope("doc.md"),
            "### Section A\n\nagain",
            Some(&Anchor::Heading(vec!["Section B".to_string()])),
            false,
        )
        .unwrap();

    assert_eq!(
        doc.render(),
        "# Notes\n\n## Section B\n\n### Section A\n\nagain\n"
    );
}

#[test]
fn test_missing_scope_and_file_errors() {
    let (_file, path) = temp_doc(SCENARIO);
    let engine = Engine::default();

    assert_eq!(
        engine.view(&format!("{path}::Nope"), None),
        format!("Error: Scope not found: {path}::Nope")
    );
    assert!(engine
        .view("/definitely/not/here.md", None)
        .starts_with("Error: Failed to access /definitely/not/here.md"));
    assert!(engine.edit("::A", "x", None, false).starts_with("Error: Invalid scope"));
}

#[test]
fn test_edit_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.md").to_string_lossy().to_string();

    let result = Engine::default().edit(&path, "# Fresh\n\nbody", None, false);
    assert!(result.starts_with("Replaced"), "unexpected result: {result}");
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Fresh\n\nbody\n");

    let missing = dir.path().join("gone.md").to_string_lossy().to_string();
    assert!(Engine::default()
        .edit(&format!("{missing}::A"), "x", None, false)
        .starts_with("Error: Failed to access"));
}

#[test]
fn test_outline_text_and_json() {
    let (_file, path) = temp_doc(SCENARIO);
    let engine = Engine::default();

    assert_eq!(
        engine.outline(&path, false),
        format!("{path}::T (lines 1-9)\n  {path}::T::A (lines 3-6)\n  {path}::T::B (lines 7-9)")
    );

    let json: serde_json::Value = serde_json::from_str(&engine.outline(&path, true)).unwrap();
    assert_eq!(json[1]["path"], serde_json::json!(["T", "A"]));
    assert_eq!(json[2]["line_start"], 7);
}

#[test]
fn test_json_failure_is_not_reported_as_file_access() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = EditError::from(source);

    assert!(matches!(err, EditError::Json(_)));
    assert!(err.to_string().starts_with("Failed to render JSON: "));
}
