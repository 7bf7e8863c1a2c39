//! Smoke tests for the shopcheck binary
//!
//! None of these launch a browser.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn shopcheck() -> Command {
    let mut cmd = Command::cargo_bin("shopcheck").expect("shopcheck binary should exist");
    for key in ["BASE_URL", "TEST_EMAIL", "TEST_PASSWORD", "SHOPCHECK_CONFIG", "RUST_LOG"] {
        cmd.env_remove(key);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    shopcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    shopcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    shopcheck().assert().failure();
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_all() {
    shopcheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("TC_01 [smoke]"))
        .stdout(predicate::str::contains("TC_15 [functional]"));
}

#[test]
fn test_list_smoke_only() {
    shopcheck()
        .args(["list", "--suite", "smoke"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TC_05"))
        .stdout(predicate::str::contains("TC_06").not());
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_prints_masked_yaml() {
    shopcheck()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url:"))
        .stdout(predicate::str::contains("https://mybook.ba"))
        .stdout(predicate::str::contains("password123").not());
}

#[test]
fn test_config_reads_environment() {
    shopcheck()
        .arg("config")
        .env("BASE_URL", "http://localhost:8080/")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8080"))
        .stdout(predicate::str::contains("8080/").not());
}

#[test]
fn test_config_init_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shopcheck.yaml");

    shopcheck()
        .args(["config", "--init"])
        .arg(&path)
        .assert()
        .success();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("workers: 5"));

    shopcheck()
        .args(["config", "--init"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_rejects_bad_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "base_url: ftp://mybook.ba\n").unwrap();

    shopcheck()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base_url"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_unknown_suite() {
    shopcheck()
        .args(["run", "--suite", "nightly"])
        .assert()
        .failure();
}

#[test]
fn test_run_zero_workers() {
    shopcheck()
        .args(["run", "-j", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("workers must be at least 1"));
}

#[test]
fn test_run_empty_selection() {
    shopcheck()
        .args(["run", "--suite", "smoke", "--filter", "TC_12"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scenario matches"));
}
