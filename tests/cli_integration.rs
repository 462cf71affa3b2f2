//! Integration tests for the `ty` CLI.
//!
//! Each test creates a temp data directory, runs `ty` as a subprocess, and
//! verifies stdout and/or file contents.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `ty` binary.
fn ty_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("ty");
    path
}

/// Run `ty` with the given args in the given directory, returning (stdout, stderr, success).
fn run_ty(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(ty_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run ty");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `ty` expecting success, return stdout.
fn run_ty_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_ty(dir, args);
    if !success {
        panic!(
            "ty {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Add + list
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_list() {
    let tmp = tempfile::TempDir::new().unwrap();

    run_ty_ok(tmp.path(), &["add", "Buy milk"]);
    run_ty_ok(tmp.path(), &["add", "Call mom"]);

    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("1 [ ] Buy milk"));
    assert!(out.contains("2 [ ] Call mom"));
}

#[test]
fn test_add_blank_is_a_noop() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_ty_ok(tmp.path(), &["add", "   "]);
    assert!(out.contains("nothing to add"));
    // No save happened — the file was never created
    assert!(!tmp.path().join("tasks.json").exists());

    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("no tasks"));
}

#[test]
fn test_list_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("no tasks"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "Buy milk"]);

    let out = run_ty_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["position"], 1);
    assert_eq!(arr[0]["name"], "Buy milk");
    assert_eq!(arr[0]["completed"], false);
    assert!(arr[0]["created_at"].is_string());
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);
    run_ty_ok(tmp.path(), &["add", "B"]);
    run_ty_ok(tmp.path(), &["done", "1"]);

    let out = run_ty_ok(tmp.path(), &["list", "--filter", "active"]);
    assert!(out.contains("B"));
    assert!(!out.contains("A"));

    let out = run_ty_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert!(out.contains("[x] A"));
    assert!(!out.contains("B"));

    // Positions refer to the full list even when filtered
    assert!(out.contains("1 [x] A"));
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[test]
fn test_done_and_reopen() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "Buy milk"]);

    let out = run_ty_ok(tmp.path(), &["done", "1"]);
    assert!(out.contains("done: Buy milk"));
    assert!(run_ty_ok(tmp.path(), &["list"]).contains("1 [x] Buy milk"));

    let out = run_ty_ok(tmp.path(), &["reopen", "1"]);
    assert!(out.contains("reopened: Buy milk"));
    assert!(run_ty_ok(tmp.path(), &["list"]).contains("1 [ ] Buy milk"));
}

#[test]
fn test_toggle() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);

    run_ty_ok(tmp.path(), &["toggle", "1"]);
    assert!(run_ty_ok(tmp.path(), &["list"]).contains("[x] A"));
    run_ty_ok(tmp.path(), &["toggle", "1"]);
    assert!(run_ty_ok(tmp.path(), &["list"]).contains("[ ] A"));
}

#[test]
fn test_rename() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);
    run_ty_ok(tmp.path(), &["add", "B"]);

    let out = run_ty_ok(tmp.path(), &["rename", "1", "A-edited"]);
    assert!(out.contains("renamed \"A\" to \"A-edited\""));

    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("1 [ ] A-edited"));
    assert!(out.contains("2 [ ] B"));
}

#[test]
fn test_delete_keeps_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);
    run_ty_ok(tmp.path(), &["add", "B"]);
    run_ty_ok(tmp.path(), &["add", "C"]);

    let out = run_ty_ok(tmp.path(), &["delete", "2"]);
    assert!(out.contains("deleted: B"));

    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("1 [ ] A"));
    assert!(out.contains("2 [ ] C"));
    assert!(!out.contains("B"));
}

#[test]
fn test_out_of_range_position_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);

    let (_, stderr, success) = run_ty(tmp.path(), &["done", "5"]);
    assert!(!success);
    assert!(stderr.contains("no task at position 5"));

    let (_, stderr, success) = run_ty(tmp.path(), &["delete", "0"]);
    assert!(!success);
    assert!(stderr.contains("no task at position 0"));
}

// ---------------------------------------------------------------------------
// Persistence details
// ---------------------------------------------------------------------------

#[test]
fn test_tasks_file_shape() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "Buy milk"]);
    run_ty_ok(tmp.path(), &["done", "1"]);

    let content = std::fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "Buy milk");
    assert_eq!(arr[0]["completed"], true);
    // ISO-8601 timestamp
    let created = arr[0]["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    // Pretty-printed
    assert!(content.contains("\n"));
}

#[test]
fn test_created_at_survives_mutations() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);

    let read_created = || {
        let content = std::fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        parsed[0]["created_at"].as_str().unwrap().to_string()
    };

    let created = read_created();
    std::thread::sleep(std::time::Duration::from_millis(20));
    run_ty_ok(tmp.path(), &["done", "1"]);
    run_ty_ok(tmp.path(), &["rename", "1", "A2"]);
    assert_eq!(read_created(), created);
}

#[test]
fn test_malformed_file_degrades_to_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("tasks.json"), "not valid json").unwrap();

    let (stdout, stderr, success) = run_ty(tmp.path(), &["list"]);
    assert!(success);
    assert!(stdout.contains("no tasks"));
    assert!(stderr.contains("warning"));

    // Listing does not repair the file
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("tasks.json")).unwrap(),
        "not valid json"
    );

    // The next mutation overwrites it
    run_ty_ok(tmp.path(), &["add", "fresh"]);
    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("1 [ ] fresh"));
}

#[test]
fn test_unknown_fields_are_tolerated() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("tasks.json"),
        r#"[{"name": "legacy", "completed": false, "color": "red", "priority": 9}]"#,
    )
    .unwrap();

    let out = run_ty_ok(tmp.path(), &["list"]);
    assert!(out.contains("1 [ ] legacy"));
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[test]
fn test_recovery_records_deletes_and_parse_failures() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "Buy milk"]);
    run_ty_ok(tmp.path(), &["delete", "1"]);

    let out = run_ty_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("delete: task \"Buy milk\" deleted"));
    assert!(out.contains("Buy milk"));

    std::fs::write(tmp.path().join("tasks.json"), "garbage here").unwrap();
    run_ty_ok(tmp.path(), &["list"]);

    let out = run_ty_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("parser: unreadable tasks file"));
    assert!(out.contains("garbage here"));
}

#[test]
fn test_recovery_prune_all() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ty_ok(tmp.path(), &["add", "A"]);
    run_ty_ok(tmp.path(), &["delete", "1"]);

    let out = run_ty_ok(tmp.path(), &["recovery", "prune", "--all"]);
    assert!(out.contains("pruned 1 entry"));

    let out = run_ty_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("recovery log is empty"));
}

#[test]
fn test_recovery_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ty_ok(tmp.path(), &["recovery", "path"]);
    assert!(out.trim().ends_with(".recovery.jsonl"));
}

// ---------------------------------------------------------------------------
// -C / --dir
// ---------------------------------------------------------------------------

#[test]
fn test_dir_override() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    std::fs::create_dir(&data).unwrap();

    let elsewhere = tempfile::TempDir::new().unwrap();
    let dir_arg = data.to_str().unwrap();
    run_ty_ok(elsewhere.path(), &["-C", dir_arg, "add", "remote task"]);

    assert!(data.join("tasks.json").exists());
    let out = run_ty_ok(elsewhere.path(), &["-C", dir_arg, "list"]);
    assert!(out.contains("remote task"));
}
