// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle through the CLI. The real spd binary is started
//! against an endpoint that refuses connections, so the daemon runs but
//! never goes live.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn daemon_status_when_not_running() {
    let home = TestHome::new();
    home.sp()
        .args(["daemon", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon not running"));
}

#[test]
fn daemon_status_surfaces_the_last_error() {
    let home = TestHome::new();
    let state_dir = home.state_dir();
    std::fs::create_dir_all(&state_dir).unwrap();
    std::fs::write(state_dir.join("last_error"), "authentication rejected\n").unwrap();

    home.sp()
        .args(["daemon", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon not running"))
        .stdout(predicate::str::contains("last error: authentication rejected"));
}

#[test]
fn daemon_stop_when_not_running_is_a_noop() {
    let home = TestHome::new();
    home.sp()
        .args(["daemon", "stop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon not running"));
}

#[test]
fn daemon_start_with_a_missing_binary_fails() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.sp()
        .args(["daemon", "start"])
        .env("SP_DAEMON_BINARY", "/nonexistent/spd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to start daemon"));
}

#[test]
fn daemon_start_status_stop_roundtrip() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);

    home.sp()
        .args(["daemon", "start"])
        .env("SP_DAEMON_BINARY", spd_binary())
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon started"));

    home.sp()
        .args(["daemon", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon running"))
        .stdout(predicate::str::contains("connection:"));

    // Starting again is a no-op.
    home.sp()
        .args(["daemon", "start"])
        .env("SP_DAEMON_BINARY", spd_binary())
        .assert()
        .success()
        .stdout(predicate::str::contains("already running"));

    home.sp()
        .args(["daemon", "stop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon stopped"));

    home.sp()
        .args(["daemon", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon not running"));
}
