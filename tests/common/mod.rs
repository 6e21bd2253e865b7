//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get an lqc command isolated from the user's own settings
pub fn lqc() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("lqc"));
    cmd.env("LQC_AUTHOR", "tester")
        .env("LQC_CONFIG", "/nonexistent/lqc-test-config.yaml")
        .env_remove("LQC_EXPORT_DIR")
        .env_remove("LQC_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    lqc().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to register cases from a range expression
pub fn create_cases(tmp: &TempDir, range: &str, prepared: &str, tech: &str) {
    lqc()
        .current_dir(tmp.path())
        .args([
            "case",
            "new",
            "--range",
            range,
            "--prepared",
            prepared,
            "--tech",
            tech,
        ])
        .assert()
        .success();
}

/// Helper to complete cases
pub fn complete_cases(
    tmp: &TempDir,
    accessions: &[&str],
    screened: &str,
    pathologist: &str,
    minutes: u32,
) {
    let minutes = minutes.to_string();
    let mut args = vec!["case", "complete"];
    args.extend_from_slice(accessions);
    args.extend_from_slice(&[
        "--screened",
        screened,
        "--pathologist",
        pathologist,
        "--minutes",
        minutes.as_str(),
    ]);
    lqc().current_dir(tmp.path()).args(&args).assert().success();
}

/// Record files stored under a project directory
pub fn record_files(tmp: &TempDir, dir: &str) -> Vec<PathBuf> {
    let path = tmp.path().join(dir);
    if !path.exists() {
        return Vec::new();
    }
    fs::read_dir(path)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(".lqc.yaml"))
        .collect()
}

/// Stdout of a successful command as a String
pub fn stdout_of(tmp: &TempDir, args: &[&str]) -> String {
    let output = lqc().current_dir(tmp.path()).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}
