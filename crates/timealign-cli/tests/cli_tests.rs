//! Integration tests for the `timealign` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to exercise the suggest and
//! validate subcommands through the actual binary: file and stdin input,
//! flag overrides, output files, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn scenario_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/scenario.json")
}

fn recurring_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/recurring.json")
}

fn timealign() -> Command {
    let mut cmd = Command::cargo_bin("timealign").unwrap();
    for var in [
        "TIMEALIGN_GROUP",
        "TIMEALIGN_RANGE_START",
        "TIMEALIGN_RANGE_END",
        "TIMEALIGN_DURATION_MINS",
        "TIMEALIGN_GRANULARITY_MINS",
        "TIMEALIGN_MIN_COVERAGE",
        "TIMEALIGN_TIMEZONE",
        "TIMEALIGN_CONCURRENT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Run `suggest` with `args` and parse stdout as a JSON array.
fn suggest_json(args: &[&str]) -> Vec<Value> {
    let output = timealign()
        .arg("suggest")
        .args(args)
        .output()
        .expect("binary must run");
    assert!(
        output.status.success(),
        "suggest failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    value.as_array().expect("top-level array").clone()
}

fn starts(slots: &[Value]) -> Vec<&str> {
    slots.iter().map(|s| s["start"].as_str().unwrap()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// suggest
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn suggest_from_file_requires_full_coverage() {
    let slots = suggest_json(&["-i", scenario_path()]);
    assert_eq!(
        starts(&slots),
        vec![
            "2025-01-06T00:00:00Z",
            "2025-01-06T02:00:00Z",
            "2025-01-06T03:00:00Z"
        ]
    );
    for slot in &slots {
        assert_eq!(slot["coverage_ratio"], 1.0);
        assert_eq!(slot["total_members"], 2);
        assert_eq!(slot["available_members"], 2);
    }
}

#[test]
fn suggest_min_coverage_flag_overrides_document() {
    let slots = suggest_json(&["-i", scenario_path(), "--min-coverage", "0.5"]);
    assert_eq!(slots.len(), 4);
    let last = slots.last().unwrap();
    assert_eq!(last["start"], "2025-01-06T01:00:00Z");
    assert_eq!(last["coverage_ratio"], 0.5);
}

#[test]
fn suggest_reads_stdin() {
    let doc = std::fs::read_to_string(scenario_path()).unwrap();
    timealign()
        .arg("suggest")
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start\": \"2025-01-06T02:00:00Z\""));
}

#[test]
fn suggest_expands_recurring_calendars() {
    let slots = suggest_json(&["-i", recurring_path()]);
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[0]["start"], "2025-01-06T17:00:00Z");
    assert_eq!(slots[0]["end"], "2025-01-06T18:00:00Z");
    assert_eq!(slots[8]["start"], "2025-01-06T08:00:00Z");
    assert!(!starts(&slots).contains(&"2025-01-06T09:00:00Z"));
    assert!(!starts(&slots).contains(&"2025-01-06T14:00:00Z"));
}

#[test]
fn suggest_timezone_flag_moves_the_preferred_window() {
    let slots = suggest_json(&["-i", recurring_path(), "--timezone", "Europe/Berlin"]);
    // 13:00Z is 14:00 in Berlin, the first preferred hour.
    assert_eq!(slots[0]["start"], "2025-01-06T13:00:00Z");
}

#[test]
fn suggest_concurrent_matches_sequential() {
    let sequential = suggest_json(&["-i", recurring_path()]);
    let concurrent = suggest_json(&["-i", recurring_path(), "--concurrent"]);
    assert_eq!(sequential, concurrent);
}

#[test]
fn suggest_with_ad_hoc_members() {
    let calendar = r#"{"calendar": {"alice": [
        {"kind": "once", "start": "2025-01-06T10:00:00Z", "end": "2025-01-06T11:00:00Z"}
    ]}}"#;
    timealign()
        .args([
            "suggest",
            "--members",
            "alice,bob,carol",
            "--range-start",
            "2025-01-06T10:00:00Z",
            "--range-end",
            "2025-01-06T12:00:00Z",
            "--granularity-mins",
            "60",
        ])
        .write_stdin(calendar)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_members\": 3"))
        .stdout(predicate::str::contains("2025-01-06T11:00:00Z"))
        .stdout(predicate::str::contains("\"start\": \"2025-01-06T10:00:00Z\"").not());
}

#[test]
fn suggest_writes_output_file() {
    let output_path = std::env::temp_dir().join("timealign-test-suggest-output.json");
    let _ = std::fs::remove_file(&output_path);

    timealign()
        .args(["suggest", "-i", scenario_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn suggest_empty_result_is_success() {
    let slots = suggest_json(&[
        "-i",
        scenario_path(),
        "--range-end",
        "2025-01-06T00:30:00Z",
    ]);
    assert!(slots.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unknown_group_fails() {
    timealign()
        .args(["suggest", "-i", scenario_path(), "--group", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Group not found: nope"));
}

#[test]
fn reversed_range_fails() {
    timealign()
        .args([
            "suggest",
            "-i",
            scenario_path(),
            "--range-end",
            "2025-01-05T00:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn coverage_above_one_fails() {
    timealign()
        .args(["suggest", "-i", scenario_path(), "--min-coverage", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_coverage"));
}

#[test]
fn group_and_members_flags_conflict() {
    timealign()
        .args([
            "suggest",
            "-i",
            scenario_path(),
            "--group",
            "algo",
            "--members",
            "alice,carol",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn dense_recurring_rule_fails_instead_of_truncating() {
    let doc = r#"{
        "request": {"range_start": "2025-01-06T00:00:00Z", "range_end": "2025-01-13T00:00:00Z"},
        "calendar": {"ticker": [
            {"kind": "recurring", "rrule": "FREQ=MINUTELY;INTERVAL=2",
             "dtstart": "2025-01-06T00:00:00", "duration_mins": 1}
        ]}
    }"#;
    timealign()
        .args(["suggest", "--members", "ticker,bob"])
        .write_stdin(doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("member ticker"))
        .stderr(predicate::str::contains("more than 2000 instances"));
}

#[test]
fn malformed_document_fails() {
    timealign()
        .arg("suggest")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse input document"));
}

#[test]
fn missing_input_file_fails() {
    timealign()
        .args(["suggest", "-i", "/nonexistent/timealign.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// validate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_reports_members_and_windows() {
    timealign()
        .args(["validate", "-i", recurring_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ok: group 'thesis', 3 members, 19 candidate windows",
        ));
}

#[test]
fn validate_rejects_missing_range() {
    timealign()
        .args(["validate", "--members", "alice"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No range start given"));
}

#[test]
fn help_lists_subcommands() {
    timealign()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("validate"));
}
