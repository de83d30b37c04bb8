//! Integration tests for the `trafficlens` binary.
//!
//! Only the non-interactive surface is exercised: help, version and
//! `--print-config`. No terminal and no server are needed.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with env isolation: config dirs point at an empty
/// temp dir and `TRAFFICLENS_*` overrides are cleared.
fn trafficlens_cmd(home: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("trafficlens");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("TRAFFICLENS_URL")
        .env_remove("TRAFFICLENS_SERVER__URL")
        .env_remove("TRAFFICLENS_DISPLAY__TRAFFIC_CAPACITY")
        .env_remove("RUST_LOG");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_lists_flags() {
    let home = tempfile::tempdir().unwrap();
    trafficlens_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--print-config"));
}

#[test]
fn test_version() {
    let home = tempfile::tempdir().unwrap();
    trafficlens_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trafficlens"));
}

// ── --print-config ──────────────────────────────────────────────────

#[test]
fn test_print_config_defaults() {
    let home = tempfile::tempdir().unwrap();
    trafficlens_cmd(&home)
        .arg("--print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains(r#"url = "http://localhost:5000""#))
        .stdout(predicate::str::contains("traffic_capacity = 50"))
        .stdout(predicate::str::contains("alert_duration_secs = 10"));
}

#[test]
fn test_url_flag_and_env_override() {
    let home = tempfile::tempdir().unwrap();
    trafficlens_cmd(&home)
        .args(["--print-config", "-u", "http://sensor.local:5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"url = "http://sensor.local:5000""#));

    trafficlens_cmd(&home)
        .arg("--print-config")
        .env("TRAFFICLENS_URL", "https://ids.example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"url = "https://ids.example.com""#));
}

#[test]
fn test_config_file_is_honored() {
    let home = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[display]\ntraffic_capacity = 5\nchart_points = 30").unwrap();

    trafficlens_cmd(&home)
        .arg("--print-config")
        .arg("--config")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("traffic_capacity = 5"))
        .stdout(predicate::str::contains("chart_points = 30"));
}

#[test]
fn test_url_flag_rescues_bad_file_url() {
    let home = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nurl = \"not a url\"").unwrap();

    trafficlens_cmd(&home)
        .arg("--print-config")
        .arg("--config")
        .arg(file.path())
        .args(["--url", "http://sensor.local:5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"url = "http://sensor.local:5000""#));
}

// ── Errors ──────────────────────────────────────────────────────────

#[test]
fn test_unsupported_url_scheme_fails() {
    let home = tempfile::tempdir().unwrap();
    trafficlens_cmd(&home)
        .args(["--print-config", "--url", "ftp://localhost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.url"));
}

#[test]
fn test_invalid_config_value_fails() {
    let home = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[display]\ntraffic_capacity = 0").unwrap();

    trafficlens_cmd(&home)
        .arg("--print-config")
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("display.traffic_capacity"));
}
