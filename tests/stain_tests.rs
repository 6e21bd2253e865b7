//! Stain QC command tests

mod common;

use common::{lqc, record_files, setup_test_project, stdout_of};
use predicates::prelude::*;

#[test]
fn test_stain_log_single() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path())
        .args([
            "stain",
            "log",
            "--stain",
            "pap",
            "--rating",
            "acceptable",
            "--tech",
            "AB",
            "--date",
            "2025-05-19",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged acceptable for PAP on 5/19/2025"));

    assert_eq!(record_files(&tmp, "stains").len(), 1);
}

#[test]
fn test_stain_log_multiple_creates_entry_per_stain() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path())
        .args([
            "stain",
            "log",
            "--stain",
            "GMS,PAP",
            "--stain",
            "gms",
            "--rating",
            "unacceptable",
            "--tech",
            "AB",
            "--date",
            "2025-05-19",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GMS, PAP"));

    assert_eq!(record_files(&tmp, "stains").len(), 2);
}

#[test]
fn test_stain_log_requires_stain() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path())
        .args(["stain", "log", "--rating", "acceptable", "--tech", "AB"])
        .assert()
        .failure();
}

#[test]
fn test_stain_log_rejects_future_date() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path())
        .args([
            "stain",
            "log",
            "--stain",
            "PAP",
            "--rating",
            "acceptable",
            "--tech",
            "AB",
            "--date",
            "2999-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("future"));
}

#[test]
fn test_stain_list_filters() {
    let tmp = setup_test_project();
    for (stain, date) in [("PAP", "2025-05-19"), ("GMS", "2025-05-19"), ("PAP", "2025-05-20")] {
        lqc()
            .current_dir(tmp.path())
            .args([
                "stain",
                "log",
                "--stain",
                stain,
                "--rating",
                "acceptable",
                "--tech",
                "AB",
                "--date",
                date,
            ])
            .assert()
            .success();
    }

    let out = stdout_of(&tmp, &["stain", "list", "--stain", "pap", "-f", "csv"]);
    assert_eq!(out.lines().count(), 3);
    assert!(!out.contains("GMS"));

    let out = stdout_of(&tmp, &["stain", "list", "--date", "2025-05-19", "-f", "csv"]);
    assert_eq!(out.lines().count(), 3);
    assert!(out.contains("GMS"));

    lqc()
        .current_dir(tmp.path())
        .args(["stain", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 stain QC entries found."));
}

#[test]
fn test_stain_list_empty() {
    let tmp = setup_test_project();

    lqc()
        .current_dir(tmp.path())
        .args(["stain", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stain QC entries found."));
}
