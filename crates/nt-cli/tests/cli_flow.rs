//! End-to-end tests driving the `nt` binary.
//!
//! Each test points the binary at a database inside its own temp directory,
//! records events, and checks what the query commands report.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn nt_binary() -> String {
    env!("CARGO_BIN_EXE_nt").to_string()
}

/// Runs `nt` with an isolated home directory and database.
fn nt(temp: &Path, args: &[&str]) -> Output {
    Command::new(nt_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join("config"))
        .env("XDG_DATA_HOME", temp.join("data"))
        .env("NT_DATABASE_PATH", temp.join("db/nt.db"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run nt")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "nt should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn add(temp: &Path, start: &str, end: &str, description: &str) -> Output {
    nt(temp, &["add", "--start", start, "--end", end, description])
}

#[test]
fn recorded_events_are_ranked_across_invocations() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    stdout(&add(home, "2025-01-01T09:00:00Z", "2025-01-01T10:00:00Z", "Writing"));
    stdout(&add(home, "2025-01-01T10:30:00Z", "2025-01-01T11:00:00Z", "Email"));
    stdout(&add(home, "2025-01-01T11:15:00Z", "2025-01-01T11:45:00Z", "Writing"));

    assert!(home.join("db/nt.db").exists(), "database should be created");

    let top: serde_json::Value =
        serde_json::from_str(&stdout(&nt(home, &["top", "--json"]))).unwrap();
    assert_eq!(top["description"], "Writing");
    assert_eq!(top["total_duration_ms"], 90 * 60_000);

    let clipped: serde_json::Value = serde_json::from_str(&stdout(&nt(
        home,
        &[
            "top",
            "--json",
            "--start",
            "2025-01-01T09:45:00Z",
            "--end",
            "2025-01-01T11:20:00Z",
        ],
    )))
    .unwrap();
    assert_eq!(clipped["description"], "Email");

    let events = stdout(&nt(home, &["events", "--json"]));
    assert_eq!(events.lines().count(), 3);
}

#[test]
fn overlapping_events_are_rejected() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    stdout(&add(home, "2025-01-01T09:00:00Z", "2025-01-01T10:00:00Z", "Meeting"));
    let output = add(home, "2025-01-01T09:30:00Z", "2025-01-01T10:30:00Z", "Lunch");

    assert!(!output.status.success(), "overlapping add should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("would overlap"), "stderr was: {stderr}");

    let events = stdout(&nt(home, &["events", "--json"]));
    assert_eq!(events.lines().count(), 1);
}

#[test]
fn add_without_description_reuses_the_latest_one() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    stdout(&add(home, "2025-01-01T09:00:00Z", "2025-01-01T09:30:00Z", "Reading"));
    stdout(&nt(
        home,
        &[
            "add",
            "--start",
            "2025-01-01T10:00:00Z",
            "--end",
            "2025-01-01T10:30:00Z",
        ],
    ));

    let recent = stdout(&nt(home, &["recent"]));
    assert_eq!(
        recent,
        "Most recent: 2025-01-01T10:00:00.000Z/2025-01-01T10:30:00.000Z: Reading\n"
    );
}

#[test]
fn empty_database_reports_no_events() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    assert_eq!(stdout(&nt(home, &["top"])), "No events recorded.\n");
    assert_eq!(stdout(&nt(home, &["recent", "--json"])), "null\n");

    let status = stdout(&nt(home, &["status"]));
    assert!(status.contains("Events: 0"), "status was: {status}");
}
