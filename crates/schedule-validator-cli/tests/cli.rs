use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn schedval() -> Command {
    let mut cmd = Command::cargo_bin("schedval").unwrap();
    cmd.env_remove("TZ").env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn draft_json(start_hour: &str, end_hour: &str) -> String {
    format!(
        r#"{{
            "title": "Kickoff",
            "description": "Project kickoff",
            "location": "Room 4",
            "type": "Planning",
            "start_date": "2026-03-16",
            "start_hour": "{start_hour}",
            "end_date": "2026-03-16",
            "end_hour": "{end_hour}",
            "customer_id": 1,
            "contact_id": 2,
            "user_id": 3
        }}"#
    )
}

// 10:00-11:00 EDT on 2026-03-16
const EXISTING: &str = r#"[
    {"id": 7, "start": "2026-03-16T14:00:00Z", "end": "2026-03-16T15:00:00Z"}
]"#;

// ── validate ────────────────────────────────────────────────────────────────

#[test]
fn test_validate_ok() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", &draft_json("9", "10"));
    let existing = write(&dir, "existing.json", EXISTING);

    schedval()
        .args(["validate", "--zone", "America/New_York", "--draft"])
        .arg(&draft)
        .arg("--existing")
        .arg(&existing)
        .assert()
        .success()
        .stdout(predicate::str::diff("ok\n"));
}

#[test]
fn test_validate_reports_overlap() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", &draft_json("10", "11"));
    let existing = write(&dir, "existing.json", EXISTING);

    schedval()
        .args(["validate", "--zone", "America/New_York", "--draft"])
        .arg(&draft)
        .arg("--existing")
        .arg(&existing)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("overlapping_appointment"))
        .stdout(predicate::str::contains("#7"));
}

#[test]
fn test_validate_json_output() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", &draft_json("6", "23"));

    let output = schedval()
        .args(["validate", "--json", "--zone", "America/New_York", "--draft"])
        .arg(&draft)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ok"], false);
    let subjects: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["subject"].as_str().unwrap())
        .collect();
    assert_eq!(
        subjects,
        vec!["start_outside_business_hours", "end_outside_business_hours"]
    );
}

#[test]
fn test_validate_malformed_draft() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", r#"{"description": "x"}"#);

    schedval()
        .args(["validate", "--zone", "UTC", "--draft"])
        .arg(&draft)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("title: Title field must be completed."))
        .stdout(predicate::str::contains("start_not_before_end").not());
}

#[test]
fn test_validate_zone_from_env() {
    let dir = TempDir::new().unwrap();
    // 06:00 in Los Angeles is 09:00 Eastern
    let draft = write(&dir, "draft.json", &draft_json("6", "7"));

    schedval()
        .env("TZ", "America/Los_Angeles")
        .args(["validate", "--draft"])
        .arg(&draft)
        .assert()
        .success();
}

#[test]
fn test_validate_missing_zone_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", &draft_json("9", "10"));

    schedval()
        .args(["validate", "--draft"])
        .arg(&draft)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("TZ is not set"));
}

#[test]
fn test_validate_invalid_zone() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", &draft_json("9", "10"));

    schedval()
        .args(["validate", "--zone", "Nowhere/Special", "--draft"])
        .arg(&draft)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_validate_with_policy_file() {
    let dir = TempDir::new().unwrap();
    let draft = write(&dir, "draft.json", &draft_json("17", "18"));
    let policy = write(&dir, "policy.json", r#"{"open_hour": 9, "close_hour": 17}"#);

    schedval()
        .args(["validate", "--zone", "America/New_York", "--draft"])
        .arg(&draft)
        .arg("--policy")
        .arg(&policy)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("9:00 AM to 5:00 PM"));
}

#[test]
fn test_validate_missing_file() {
    schedval()
        .args(["validate", "--zone", "UTC", "--draft", "/nonexistent/draft.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("reading"));
}

// ── upcoming ────────────────────────────────────────────────────────────────

const STORED: &str = r#"[
    {
        "id": 3, "title": "Sync", "description": "Weekly sync", "location": "Online",
        "type": "Sync", "start": "2026-03-16T14:10:00Z", "end": "2026-03-16T14:40:00Z",
        "customer_id": 1, "contact_id": 1, "user_id": 1,
        "audit": {
            "created_by": "seed", "created_at": "2026-03-01T00:00:00Z",
            "last_updated_by": "seed", "last_updated_at": "2026-03-01T00:00:00Z"
        }
    }
]"#;

#[test]
fn test_upcoming_found() {
    let dir = TempDir::new().unwrap();
    let stored = write(&dir, "appointments.json", STORED);

    schedval()
        .args(["upcoming", "--now", "2026-03-16T14:00:00Z", "--appointments"])
        .arg(&stored)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "upcoming appointment with ID 3 at 2026-03-16T14:10:00+00:00",
        ));
}

#[test]
fn test_upcoming_none_in_window() {
    let dir = TempDir::new().unwrap();
    let stored = write(&dir, "appointments.json", STORED);

    schedval()
        .args([
            "upcoming",
            "--now",
            "2026-03-16T13:00:00Z",
            "--window-minutes",
            "30",
            "--appointments",
        ])
        .arg(&stored)
        .assert()
        .success()
        .stdout(predicate::str::contains("no upcoming appointments"));
}

#[test]
fn test_upcoming_invalid_now() {
    let dir = TempDir::new().unwrap();
    let stored = write(&dir, "appointments.json", STORED);

    schedval()
        .args(["upcoming", "--now", "soon", "--appointments"])
        .arg(&stored)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --now"));
}

#[test]
fn test_upcoming_window_out_of_range() {
    let dir = TempDir::new().unwrap();
    let stored = write(&dir, "appointments.json", STORED);

    schedval()
        .args([
            "upcoming",
            "--now",
            "2026-03-16T14:00:00Z",
            "--window-minutes",
            "9223372036854775807",
            "--appointments",
        ])
        .arg(&stored)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--window-minutes out of range"));
}

#[test]
fn test_upcoming_policy_window_out_of_range() {
    let dir = TempDir::new().unwrap();
    let stored = write(&dir, "appointments.json", STORED);
    let policy = write(
        &dir,
        "policy.json",
        r#"{"upcoming_window_minutes": 9223372036854775807}"#,
    );

    schedval()
        .args(["upcoming", "--now", "2026-03-16T14:00:00Z", "--appointments"])
        .arg(&stored)
        .arg("--policy")
        .arg(&policy)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("out of range"));
}
