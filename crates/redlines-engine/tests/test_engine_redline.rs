//! Integration tests for driving the redlines binary.

#![cfg(unix)]

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{write_tar_bundle, Fixture, VERSION};
use pretty_assertions::assert_eq;
use redlines_engine::{DocumentInput, Engine, EngineError};

fn engine(fixture: &Fixture) -> Engine {
    Engine::new(fixture.config()).expect("engine construction")
}

#[test]
fn test_redline_from_bytes() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    let output = engine
        .run_redline("TestAuthor", b"original text".to_vec(), b"modified text".to_vec())
        .unwrap();

    assert!(!output.redline.is_empty());
    assert_eq!(
        String::from_utf8(output.redline.clone()).unwrap(),
        "author=TestAuthor\noriginal text\n--\nmodified text"
    );
    assert!(output.stderr.is_none());
    assert!(output.stdout.as_deref().unwrap().contains("Revisions found: 9"));
    assert_eq!(output.revision_count(), Some(9));
}

#[test]
fn test_arguments_are_positional_and_ordered() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);
    let modified = fixture.caller_file("modified.docx", b"m");

    let output = engine
        .run_redline("args", b"o".to_vec(), modified.as_path())
        .unwrap();

    let text = String::from_utf8(output.redline).unwrap();
    let args: Vec<&str> = text.lines().collect();
    assert_eq!(args.len(), 4);
    assert_eq!(args[0], "args");
    assert!(PathBuf::from(args[1]).starts_with(&fixture.scratch_dir));
    assert!(args[1].contains("redline-input-"));
    assert_eq!(PathBuf::from(args[2]), modified);
    assert!(args[3].contains("redline-output-"));
    assert!(output.stdout.is_none());
}

#[test]
fn test_attribution_forwarded_verbatim() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    let output = engine
        .run_redline("Jane Doe (Legal) ü ø", b"a".to_vec(), b"b".to_vec())
        .unwrap();
    let text = String::from_utf8(output.redline).unwrap();
    assert!(text.starts_with("author=Jane Doe (Legal) ü ø\n"));
}

#[test]
fn test_transient_files_removed_after_success() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    engine
        .run_redline("TestAuthor", b"a".to_vec(), b"b".to_vec())
        .unwrap();

    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn test_transient_files_removed_after_failure() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    let err = engine
        .run_redline("fail", b"a".to_vec(), b"b".to_vec())
        .unwrap_err();

    match err {
        EngineError::ProcessFailed {
            exit_code,
            stdout,
            stderr,
        } => {
            assert_eq!(exit_code, Some(3));
            assert_eq!(stdout, None);
            assert_eq!(stderr.as_deref(), Some("Error: comparison failed\n"));
        }
        other => panic!("expected ProcessFailed, got {other}"),
    }
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn test_cleanup_failure_does_not_replace_result() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    // The binary swaps the staged original for a non-empty directory.
    let output = engine
        .run_redline("squat", b"old".to_vec(), b"new".to_vec())
        .unwrap();

    assert_eq!(output.redline, b"oldnew".to_vec());
    let left = fixture.scratch_entries();
    assert_eq!(left.len(), 1);
    assert!(left[0].is_dir());
    assert!(left[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("redline-input-"));
}

#[test]
fn test_caller_paths_are_never_deleted() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);
    let original = fixture.caller_file("original.docx", b"orig");
    let modified = fixture.caller_file("modified.docx", b"mod");

    let output = engine
        .run_redline("silent", original.as_path(), &modified)
        .unwrap();
    assert_eq!(output.redline, b"origmod");
    assert!(original.exists());
    assert!(modified.exists());

    engine
        .run_redline("fail", original.as_path(), &modified)
        .unwrap_err();
    assert!(original.exists());
    assert!(modified.exists());
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn test_empty_streams_are_absent() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    let output = engine
        .run_redline("silent", b"a".to_vec(), b"b".to_vec())
        .unwrap();
    assert_eq!(output.stdout, None);
    assert_eq!(output.stderr, None);
    assert_eq!(output.redline, b"ab");
}

#[test]
fn test_stderr_on_success_is_reported() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    let output = engine
        .run_redline("warn", b"a".to_vec(), b"b".to_vec())
        .unwrap();
    assert_eq!(output.stdout, None);
    assert_eq!(output.stderr.as_deref(), Some("deprecated option\n"));
}

#[test]
fn test_empty_result_is_output_missing() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);

    let err = engine
        .run_redline("no-output", b"a".to_vec(), b"b".to_vec())
        .unwrap_err();
    match err {
        EngineError::OutputMissing { stdout, .. } => {
            assert!(stdout.unwrap().contains("do not exist"));
        }
        other => panic!("expected OutputMissing, got {other}"),
    }
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn test_invalid_inputs_rejected_before_staging() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);
    let missing = fixture.root.path().join("missing.docx");

    let err = engine
        .run_redline("TestAuthor", b"a".to_vec(), missing.as_path())
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }));
    assert!(fixture.scratch_entries().is_empty());

    let err = engine
        .run_redline("", b"a".to_vec(), b"b".to_vec())
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }));
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn test_explicit_document_inputs() {
    let fixture = Fixture::linux();
    let engine = engine(&fixture);
    let modified = fixture.caller_file("modified.docx", b"y");

    let output = engine
        .run_redline(
            "silent",
            DocumentInput::Bytes(b"x".to_vec()),
            DocumentInput::Path(modified),
        )
        .unwrap();
    assert_eq!(output.into_parts(), (b"xy".to_vec(), None, None));
}

#[test]
fn test_concurrent_calls_do_not_collide() {
    let fixture = Fixture::linux();
    let engine = Arc::new(engine(&fixture));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let original = format!("original-{i}").into_bytes();
                let modified = format!("modified-{i}").into_bytes();
                let output = engine.run_redline("silent", original, modified).unwrap();
                (i, output.redline)
            })
        })
        .collect();

    for handle in handles {
        let (i, redline) = handle.join().unwrap();
        assert_eq!(redline, format!("original-{i}modified-{i}").into_bytes());
    }
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn test_timeout_kills_hung_binary() {
    let fixture = Fixture::new();
    write_tar_bundle(
        &fixture.bundle_dir,
        "linux-x64",
        VERSION,
        "#!/bin/sh\nexec sleep 10\n",
    );
    let engine = Engine::new(fixture.config().timeout(Duration::from_millis(300))).unwrap();

    let err = engine
        .run_redline("TestAuthor", b"a".to_vec(), b"b".to_vec())
        .unwrap_err();
    assert!(err.to_string().contains("300ms"));
    match err {
        EngineError::Timeout { timeout } => assert_eq!(timeout, Duration::from_millis(300)),
        other => panic!("expected Timeout, got {other}"),
    }
    assert!(fixture.scratch_entries().is_empty());
}
