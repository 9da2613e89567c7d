//! End-to-end session tests against real files.
//!
//! Covers the full pipeline: validation, dry-run, commit, diff, atomic
//! persistence, and the untouched-on-failure guarantee.

use std::fs;
use tempfile::TempDir;
use textpatch::{EditOperation, EditSession, EngineError};

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn op(search: &str, replacement: &str, all: bool) -> EditOperation {
    EditOperation::new(search, replacement, all).unwrap()
}

#[test]
fn replace_all_replaces_every_occurrence() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "foo bar foo");

    let session = EditSession::new(&path, vec![op("foo", "baz", true)]).unwrap();
    let result = session.run().unwrap();

    assert_eq!(result.final_content, "baz bar baz");
    assert_eq!(result.outcomes[0].occurrences_replaced, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "baz bar baz");
}

#[test]
fn duplicate_match_without_replace_all_fails_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "foo bar foo");

    let session = EditSession::new(&path, vec![op("foo", "baz", false)]).unwrap();
    let err = session.run().unwrap_err();

    match err {
        EngineError::AmbiguousMatch { index, count, .. } => {
            assert_eq!(index, 0);
            assert_eq!(count, 2);
        }
        other => panic!("expected AmbiguousMatch, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "foo bar foo");
}

#[test]
fn cancelling_operations_fail_with_no_changes() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "alpha");

    let session = EditSession::new(
        &path,
        vec![op("alpha", "beta", false), op("beta", "alpha", false)],
    )
    .unwrap();
    let err = session.run().unwrap_err();

    assert!(matches!(err, EngineError::NoChanges));
    assert_eq!(fs::read_to_string(&path).unwrap(), "alpha");
}

#[test]
fn operations_see_previous_output_not_original() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "x");

    let session = EditSession::new(&path, vec![op("x", "y", false), op("y", "z", false)]).unwrap();
    let result = session.run().unwrap();

    assert_eq!(result.final_content, "z");
    assert_eq!(fs::read_to_string(&path).unwrap(), "z");
}

#[test]
fn midchain_failure_leaves_file_byte_identical() {
    let dir = TempDir::new().unwrap();
    let original = "line one\nline two\nline three\n";
    let path = write_fixture(&dir, "f.txt", original);

    // Operation 0 would succeed; operation 1 cannot match.
    let session = EditSession::new(
        &path,
        vec![op("line one", "LINE ONE", false), op("absent", "x", false)],
    )
    .unwrap();
    let err = session.run().unwrap_err();

    assert_eq!(err.failing_index(), Some(1));
    assert_eq!(fs::read(&path).unwrap(), original.as_bytes());
}

#[test]
fn operations_after_failure_are_not_evaluated() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "seed");

    // Index 2 would also fail; the reported index must be 1.
    let session = EditSession::new(
        &path,
        vec![
            op("seed", "grown", false),
            op("nope", "x", false),
            op("also-nope", "y", false),
        ],
    )
    .unwrap();

    assert_eq!(session.run().unwrap_err().failing_index(), Some(1));
}

#[test]
fn invalid_operation_rejected_before_any_io() {
    // The target does not even exist; validation must fire first.
    let result = EditSession::from_raw(
        "/definitely/not/a/real/file.txt",
        vec![("same", "same", false)],
    );
    assert_eq!(result.unwrap_err().reason_code(), "invalid_operation");
}

#[test]
fn search_not_found_mentions_partial_match() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "const TIMEOUT_SECONDS: u64 = 30;\n");

    let session = EditSession::new(
        &path,
        vec![op("const TIMEOUT_SECONDS: u64 = 60;", "x", false)],
    )
    .unwrap();

    let message = session.run().unwrap_err().to_string();
    assert!(message.contains("TIMEOUT_SECONDS"), "{message}");
}

#[test]
fn diff_stats_and_preview_reflect_line_changes() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "keep\nold line\nkeep\n");

    let session = EditSession::new(&path, vec![op("old line", "new line", false)]).unwrap();
    let result = session.run().unwrap();

    assert_eq!(result.diff_stats.added, 1);
    assert_eq!(result.diff_stats.removed, 1);
    assert!(result.preview.contains("2 - old line"));
    assert!(result.preview.contains("2 + new line"));
}

#[test]
fn multiline_search_text_is_supported() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "fn a() {\n    old();\n}\n");

    let session = EditSession::new(
        &path,
        vec![op("fn a() {\n    old();\n}", "fn a() {\n    new();\n}", false)],
    )
    .unwrap();
    let result = session.run().unwrap();

    assert_eq!(result.final_content, "fn a() {\n    new();\n}\n");
}

#[test]
fn running_twice_fails_second_time_when_search_is_gone() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "before");

    let session = EditSession::new(&path, vec![op("before", "after", false)]).unwrap();
    session.run().unwrap();

    let err = session.run().unwrap_err();
    assert_eq!(err.reason_code(), "search_not_found");
    assert_eq!(fs::read_to_string(&path).unwrap(), "after");
}

#[test]
fn total_replaced_sums_across_operations() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "f.txt", "a a b");

    let session = EditSession::new(
        &path,
        vec![op("a", "c", true), op("b", "d", false)],
    )
    .unwrap();
    let result = session.run().unwrap();

    assert_eq!(result.total_replaced, 3);
    assert_eq!(result.final_content, "c c d");
}
