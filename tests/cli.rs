// tests/cli.rs

//! Exit codes and output streams of the debprune binary.

mod common;

use common::{remaining, setup_package_dir, write_garbage};
use std::process::{Command, Output};

fn debprune(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_debprune"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_clean_run_exits_zero() {
    let dir = setup_package_dir();
    let output = debprune(&[dir.path().to_str().unwrap(), "1"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("linux-image-securedrop\n"));
    assert!(stdout.contains("Deleted 3 of 3 archive(s)"));
    assert_eq!(remaining(dir.path()).len(), 2);
}

#[test]
fn test_negative_keep_count_is_usage_error() {
    let dir = setup_package_dir();
    let output = debprune(&[dir.path().to_str().unwrap(), "-1"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert_eq!(remaining(dir.path()).len(), 5);
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let output = debprune(&[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_directory_is_fatal() {
    let output = debprune(&["/nonexistent/debprune/archives", "1"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_unreadable_archive_exits_partial_failure() {
    let dir = setup_package_dir();
    write_garbage(dir.path(), "broken_1.0_amd64.deb");

    let output = debprune(&[dir.path().to_str().unwrap(), "1"]);

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Could not read 1 archive(s):"));
    assert!(stdout.contains("broken_1.0_amd64.deb"));
    assert_eq!(remaining(dir.path()).len(), 3);
}

#[test]
fn test_json_dry_run() {
    let dir = setup_package_dir();
    let output = debprune(&[dir.path().to_str().unwrap(), "1", "--dry-run", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["summary"]["planned_deletions"], 3);
    assert_eq!(report["summary"]["deleted"], 0);
    assert_eq!(remaining(dir.path()).len(), 5);
}
