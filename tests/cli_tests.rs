//! CLI surface tests - help, init, range commands, completions

mod common;

use common::{lqc, setup_test_project};
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_lists_commands() {
    lqc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("case"))
        .stdout(predicate::str::contains("workload"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("stain"));
}

#[test]
fn test_version() {
    lqc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lqc"));
}

#[test]
fn test_unknown_command_fails() {
    lqc().arg("frobnicate").assert().failure();
}

// ============================================================================
// Init
// ============================================================================

#[test]
fn test_init_creates_layout() {
    let tmp = TempDir::new().unwrap();

    lqc()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized LQC project"));

    assert!(tmp.path().join(".lqc/config.yaml").is_file());
    assert!(tmp.path().join("cases").is_dir());
    assert!(tmp.path().join("stains").is_dir());
}

#[test]
fn test_init_with_path_argument() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("lab");
    std::fs::create_dir(&target).unwrap();

    lqc()
        .current_dir(tmp.path())
        .args(["init", "lab"])
        .assert()
        .success();

    assert!(target.join(".lqc").is_dir());
}

#[test]
fn test_init_twice_fails() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();

    lqc()
        .current_dir(tmp.path())
        .args(["case", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside an LQC project"));
}

#[test]
fn test_commands_work_from_subdirectory() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path().join("cases"))
        .args(["case", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cases found."));
}

// ============================================================================
// Range
// ============================================================================

#[test]
fn test_range_check_valid() {
    lqc()
        .args(["range", "check", "1-5, 8, 10-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid (9 accessions)"));
}

#[test]
fn test_range_check_descending_fails() {
    lqc()
        .args(["range", "check", "5-1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"))
        .stderr(predicate::str::contains("runs backwards"));
}

#[test]
fn test_range_check_garbage_fails() {
    lqc()
        .args(["range", "check", "1,,3"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn test_range_expand_uses_prepared_year() {
    lqc()
        .args(["range", "expand", "1-3, 7", "--prepared", "2024-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CN24-001\nCN24-002\nCN24-003\nCN24-007"));
}

#[test]
fn test_range_expand_keeps_wide_numbers() {
    lqc()
        .args(["range", "expand", "1234", "--prepared", "2025-05-19"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CN25-1234"));
}

#[test]
fn test_range_expand_json() {
    lqc()
        .args([
            "range",
            "expand",
            "9-10",
            "--prepared",
            "2025-05-19",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"CN25-009\""))
        .stdout(predicate::str::contains("\"CN25-010\""));
}

#[test]
fn test_range_expand_rejects_bad_date() {
    lqc()
        .args(["range", "expand", "1", "--prepared", "5/19/2025"])
        .assert()
        .failure();
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    lqc()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lqc"));
}
