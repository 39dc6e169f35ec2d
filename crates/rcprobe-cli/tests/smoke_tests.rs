//! Smoke tests for the rcprobe CLI
//!
//! These tests verify basic CLI functionality works correctly.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ENV_VARS: [&str; 8] = [
    "RCPROBE_CONFIG",
    "RCPROBE_HOST",
    "RCPROBE_PORT",
    "RCPROBE_BROWSER",
    "RCPROBE_URL",
    "RCPROBE_COMMAND_TIMEOUT_MS",
    "RCPROBE_DEMO_BIND",
    "RCPROBE_DEMO_PORT",
];

/// Get a command for the rcprobe binary with a clean environment
fn rcprobe() -> Command {
    let mut cmd = Command::cargo_bin("rcprobe").expect("rcprobe binary should exist");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A local port with nothing listening on it
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    rcprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    rcprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_shows_help() {
    rcprobe().assert().failure(); // Requires a subcommand
}

#[test]
fn test_run_help_lists_wait_flags() {
    rcprobe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-attempts"))
        .stdout(predicate::str::contains("--settle"))
        .stdout(predicate::str::contains("RCPROBE_HOST"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    rcprobe()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("host: localhost"))
        .stdout(predicate::str::contains("port: 4444"))
        .stdout(predicate::str::contains("max_attempts: 60"))
        .stdout(predicate::str::contains("click_command: qxClickAt"))
        .stdout(predicate::str::contains("element: id=myButton"));
}

#[test]
fn test_config_precedence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rcprobe.yaml");
    fs::write(&path, "remote:\n  host: rc.file\n  port: 5000\n").unwrap();

    rcprobe()
        .args(["config", "--config"])
        .arg(&path)
        .args(["--port", "6000"])
        .env("RCPROBE_BROWSER", "*chrome")
        .assert()
        .success()
        .stdout(predicate::str::contains("host: rc.file"))
        .stdout(predicate::str::contains("port: 6000"))
        .stdout(predicate::str::contains("*chrome"));
}

#[test]
fn test_config_rejects_invalid_values() {
    rcprobe()
        .args(["config", "--max-attempts", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("max_attempts"));
}

#[test]
fn test_config_missing_file() {
    let dir = TempDir::new().unwrap();
    rcprobe()
        .args(["config", "--config"])
        .arg(dir.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// Run Command Tests
// ============================================================================

#[test]
fn test_run_against_closed_port_fails() {
    let port = closed_port().to_string();
    rcprobe()
        .args(["run", "--color", "never", "--host", "127.0.0.1", "--port", &port])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_run_json_reports_failure() {
    let port = closed_port().to_string();
    rcprobe()
        .args(["-q", "run", "--json", "--host", "127.0.0.1", "--port", &port])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"passed\": false"))
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    rcprobe()
        .args(["serve", "--bind", "not an address", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bind address"));
}
