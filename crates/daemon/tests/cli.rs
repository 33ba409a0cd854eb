// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box tests for the linkd binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// linkd with a clean environment and a bridge URL nothing listens on.
fn linkd() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("linkd").unwrap();
    cmd.env_clear()
        .env("BRIDGE_URL", "ws://127.0.0.1:1")
        .arg("--bind")
        .arg("127.0.0.1:0");
    cmd
}

#[test]
fn help_lists_flags() {
    #[allow(deprecated)]
    Command::cargo_bin("linkd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--auth-path"))
        .stdout(predicate::str::contains("--bridge-url"))
        .stdout(predicate::str::contains("--log-file"));
}

#[test]
fn invalid_number_in_env_exits_nonzero() {
    linkd()
        .env("PORT", "http")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("PORT"));
}

#[test]
fn unreachable_bridge_is_fatal_at_startup() {
    linkd()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("transport failed to start"));
}

#[test]
fn log_file_receives_startup_logs() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("linkd.log");

    linkd()
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .failure();

    let logs = std::fs::read_to_string(&log_path).unwrap();
    assert!(logs.contains("linkd starting"));
    assert!(logs.contains("transport failed to start"));
    // No ANSI colour in files.
    assert!(!logs.contains('\u{1b}'));
}

#[test]
fn rust_log_overrides_log_level() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("linkd.log");

    linkd()
        .env("LOG_LEVEL", "debug")
        .env("RUST_LOG", "error")
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .failure()
        .code(1);

    let logs = std::fs::read_to_string(&log_path).unwrap();
    assert!(logs.contains("transport failed to start"));
    assert!(!logs.contains("linkd starting"));
}

#[test]
fn bridge_url_flag_overrides_env() {
    linkd()
        .env("BRIDGE_URL", "ws://bridge.invalid:3002")
        .arg("--bridge-url")
        .arg("ws://127.0.0.1:1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ws://127.0.0.1:1"));
}
