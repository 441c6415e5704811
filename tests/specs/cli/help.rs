// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[test]
fn sp_without_arguments_shows_usage_and_fails() {
    sp().assert()
        .failure()
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("fronting"));
}

#[test]
fn help_lists_all_commands() {
    sp().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fronting"))
        .stdout(predicate::str::contains("members"))
        .stdout(predicate::str::contains("custom-fronts"))
        .stdout(predicate::str::contains("switch"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("daemon"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn h_and_help_produce_same_output() {
    let h_output = sp().args(["fronting", "-h"]).output().unwrap();
    let help_output = sp().args(["fronting", "--help"]).output().unwrap();

    let h_stdout = String::from_utf8_lossy(&h_output.stdout);
    let help_stdout = String::from_utf8_lossy(&help_output.stdout);

    assert_eq!(h_stdout, help_stdout);
}

#[parameterized(
    fronting = { "fronting" },
    members = { "members" },
    custom_fronts = { "custom-fronts" },
    switch = { "switch" },
    status = { "status" },
    daemon = { "daemon" },
    cache = { "cache" },
)]
fn command_supports_help_flag(cmd: &str) {
    sp().args([cmd, "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(cmd));
}

#[test]
fn fronting_help_shows_examples() {
    sp().args(["fronting", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--prompt"))
        .stdout(predicate::str::contains("--no-daemon"))
        .stdout(predicate::str::contains("Examples"));
}

#[test]
fn switch_without_names_shows_help() {
    sp().arg("switch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_unknown_command_fails() {
    sp().args(["help", "nonexistent"]).assert().failure();
}

#[test]
fn version_flag_works() {
    sp().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sp"));
}

#[test]
fn profile_flag_is_global() {
    sp().args(["--profile", "work", "daemon", "--help"])
        .assert()
        .success();
}
