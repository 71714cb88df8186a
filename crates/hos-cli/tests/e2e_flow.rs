//! End-to-end integration tests for the complete planning flow.
//!
//! Tests the full pipeline: plan → logs → trips → status against a
//! real database file, driving the binary the way a dispatcher would.

use std::process::Command;

use tempfile::TempDir;

fn hos_binary() -> String {
    env!("CARGO_BIN_EXE_hos").to_string()
}

fn run_hos(temp: &TempDir, args: &[&str]) -> std::process::Output {
    let db_path = temp.path().join("hos.db");
    Command::new(hos_binary())
        .env("HOS_DATABASE_PATH", &db_path)
        .args(args)
        .output()
        .expect("failed to run hos")
}

#[test]
fn plan_then_trips_then_status() {
    let temp = TempDir::new().unwrap();

    let output = run_hos(
        &temp,
        &[
            "plan",
            "--distance",
            "550",
            "--driving-hours",
            "10",
            "--save",
        ],
    );
    assert!(
        output.status.success(),
        "plan should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("COMPLIANT"), "unexpected output: {stdout}");

    let output = run_hos(&temp, &["trips"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Trips (1):"), "unexpected output: {stdout}");

    let output = run_hos(&temp, &["status"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Trips: 1"), "unexpected output: {stdout}");
    assert!(stdout.contains("Rest breaks: 3"), "unexpected output: {stdout}");
}

#[test]
fn logs_generates_and_saves_daily_logs() {
    let temp = TempDir::new().unwrap();

    let output = run_hos(
        &temp,
        &[
            "logs",
            "--distance",
            "1650",
            "--driving-hours",
            "30",
            "--start",
            "2024-03-04T06:00:00Z",
            "--save",
        ],
    );
    assert!(
        output.status.success(),
        "logs should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    // 34 on-trip hours starting 06:00 span two calendar days.
    assert!(stdout.contains("Daily log 2024-03-04"), "unexpected output: {stdout}");
    assert!(stdout.contains("Daily log 2024-03-05"), "unexpected output: {stdout}");

    let output = run_hos(&temp, &["status"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Daily logs: 2"), "unexpected output: {stdout}");
}

#[test]
fn check_reports_blocked_driver_without_touching_database() {
    let temp = TempDir::new().unwrap();

    let output = run_hos(&temp, &["check", "--cycle-hours", "70"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NOT ELIGIBLE"), "unexpected output: {stdout}");
    assert!(
        stdout.contains("70-hour/8-day limit reached"),
        "unexpected output: {stdout}"
    );

    // check is read-only: no database file should exist.
    assert!(!temp.path().join("hos.db").exists());
}

#[test]
fn unrealistic_trip_is_rejected_with_a_specific_message() {
    let temp = TempDir::new().unwrap();

    let output = run_hos(
        &temp,
        &["plan", "--distance", "1200", "--driving-hours", "10"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unrealistic speed"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn json_plan_output_parses() {
    let temp = TempDir::new().unwrap();

    let output = run_hos(
        &temp,
        &[
            "plan",
            "--distance",
            "1200",
            "--driving-hours",
            "22",
            "--cycle-hours",
            "10",
            "--json",
        ],
    );
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["break_plan"]["fuel_stop_count"], 1);
    assert!(report["break_plan"]["breaks"].as_array().unwrap().len() >= 5);
}
