//! Corruption recovery tests for the bmi binary.
//!
//! These tests verify the system can handle:
//! - Corrupted preference files
//! - A history database that is not SQLite

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
    fs::create_dir_all(temp_dir.path().join("data")).expect("Failed to create data dir");
    temp_dir
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmi"));
    cmd.arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

#[test]
fn test_corrupted_preferences_raise_alerts() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/preferences.json"),
        "{ invalid json }}}}",
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["compute", "--weight", "154", "--height", "71"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: There was an error while loading the data",
        ))
        .stdout(predicate::str::contains(
            "Error: There was an error while saving the data",
        ))
        .stdout(predicate::str::contains("Body Mass Index is 21.5"));

    // History is still recorded
    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("21.5 (W:154, H:71)"));
}

#[test]
fn test_corrupted_preferences_fail_last() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("data/preferences.json"), "not json").unwrap();

    cli(temp_dir.path()).arg("last").assert().failure();
}

#[test]
fn test_non_sqlite_history_file_fails() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/bmi.db"),
        "not a database\n".repeat(64),
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["compute", "--weight", "154", "--height", "71"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[history\n").unwrap();

    cli(temp_dir.path()).arg("last").assert().failure();
}
