//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as the data directory.
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "planner-cli", "--"])
        .args(args)
        .env("STUDENT_PLANNER_HOME", home)
        .env_remove("STUDENT_PLANNER_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

/// Pulls the id out of "<Kind> created: <id>".
fn created_id(stdout: &str) -> String {
    stdout
        .trim()
        .rsplit(' ')
        .next()
        .expect("no id in output")
        .to_string()
}

#[test]
fn test_first_run_creates_config_and_record() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["task", "list"]);
    assert_eq!(out.trim(), "[]");
    assert!(home.path().join("config.toml").exists());
    assert!(home.path().join("db.json").exists());
}

#[test]
fn test_task_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let id = created_id(&run_ok(home.path(), &["task", "add", "Buy notebook"]));

    let list: serde_json::Value = serde_json::from_str(&run_ok(home.path(), &["task", "list"])).unwrap();
    assert_eq!(list[0]["title"], "Buy notebook");
    assert_eq!(list[0]["completed"], false);

    let out = run_ok(home.path(), &["task", "toggle", &id]);
    assert!(out.contains("done"));

    // Completed tasks delete without asking.
    let out = run_ok(home.path(), &["task", "delete", &id]);
    assert!(out.contains("Deleted task"));
    assert_eq!(run_ok(home.path(), &["task", "list"]).trim(), "[]");
}

#[test]
fn test_unfinished_delete_needs_an_answer() {
    let home = tempfile::tempdir().unwrap();
    let id = created_id(&run_ok(home.path(), &["note", "add", "keep me"]));

    // stdin is empty, so the prompt reads as "no".
    let out = run_ok(home.path(), &["note", "delete", &id]);
    assert!(out.contains("Cancelled"));

    let out = run_ok(home.path(), &["note", "delete", &id, "--yes"]);
    assert!(out.contains("Deleted note"));
}

#[test]
fn test_confirmed_delete_counts_shared_ids() {
    let home = tempfile::tempdir().unwrap();
    let id = created_id(&run_ok(home.path(), &["task", "add", "Original"]));

    let db_path = home.path().join("db.json");
    let mut db: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&db_path).unwrap()).unwrap();
    let twin = serde_json::json!({"id": db["tasks"][0]["id"], "title": "Twin", "completed": false});
    db["tasks"].as_array_mut().unwrap().push(twin);
    std::fs::write(&db_path, serde_json::to_string_pretty(&db).unwrap()).unwrap();

    let out = run_ok(home.path(), &["task", "delete", &id, "--yes"]);
    assert!(out.contains("(2 entries shared the id)"), "{out}");
    assert_eq!(run_ok(home.path(), &["task", "list"]).trim(), "[]");
}

#[test]
fn test_delete_unknown_id_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["course", "delete", "42", "--yes"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("No course with id 42"));
}

#[test]
fn test_week_view_json() {
    let home = tempfile::tempdir().unwrap();
    run_ok(
        home.path(),
        &["course", "add", "Biology", "--days", "Monday,Wednesday", "--start", "09:00", "--end", "10:00"],
    );
    run_ok(home.path(), &["assignment", "add", "Essay", "--due", "2024-03-08", "--high"]);

    let out = run_ok(
        home.path(),
        &["view", "--mode", "week", "--format", "json", "--at", "2024-03-04T09:30"],
    );
    let dash: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(dash["view"], "Week");
    assert_eq!(dash["schedule"]["layout"], "week");
    assert_eq!(dash["schedule"]["content"][0]["courses"][0]["title"], "Biology");
    assert_eq!(dash["upcoming"][0]["high_priority"], true);
    assert_eq!(dash["focus"]["subtitle"], "Happening Now");
}

#[test]
fn test_view_html_default() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["view", "--at", "2024-03-04T09:30"]);
    assert!(out.contains("<!DOCTYPE html>"));
    assert!(out.contains("Weekly Schedule"));
}

#[test]
fn test_focus_tomorrow() {
    let home = tempfile::tempdir().unwrap();
    run_ok(
        home.path(),
        &["course", "add", "Chemistry", "--days", "Tuesday", "--start", "08:30", "--end", "09:30"],
    );
    let out = run_ok(home.path(), &["focus", "--at", "2024-03-04T18:00"]);
    assert!(out.contains("Chemistry"));
    assert!(out.contains("Tomorrow at 08:30"));
}

#[test]
fn test_habit_bump_and_dark_mode() {
    let home = tempfile::tempdir().unwrap();
    let id = created_id(&run_ok(home.path(), &["habit", "add", "Water", "--target", "2", "--measure", "glasses"]));
    assert!(run_ok(home.path(), &["habit", "bump", &id]).contains("1/2"));
    assert!(run_ok(home.path(), &["habit", "bump", &id]).contains("target reached"));

    assert!(run_ok(home.path(), &["dark-mode", "toggle"]).contains("on"));
    let db = std::fs::read_to_string(home.path().join("db.json")).unwrap();
    assert!(db.contains("\"darkMode\": true"));
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "ui.default_view"]).trim(), "Week");
    run_ok(home.path(), &["config", "set", "ui.upcoming_limit", "3"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "ui.upcoming_limit"]).trim(), "3");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}

#[test]
fn test_sync_requires_configuration() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["sync", "pull"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("cloud sync is disabled"));
}

#[test]
fn test_media_without_helper_reports_error() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["media"]);
    let status: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(status["state"], "error");
}
