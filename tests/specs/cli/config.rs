// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Config loading errors as seen from the command line.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn missing_config_file_reports_its_path() {
    let home = TestHome::new();
    home.sp()
        .arg("fronting")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no config at"))
        .stderr(predicate::str::contains("default.toml"));
}

#[test]
fn empty_token_is_rejected() {
    let home = TestHome::new();
    home.write_config("token = \"   \"\n");
    home.sp()
        .arg("fronting")
        .assert()
        .failure()
        .stderr(predicate::str::contains("token must not be empty"));
}

#[test]
fn malformed_toml_is_rejected() {
    let home = TestHome::new();
    home.write_config("token = \"x\"\nthis is not toml");
    home.sp()
        .arg("fronting")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn unknown_config_key_is_rejected() {
    let home = TestHome::new();
    home.write_config("token = \"x\"\nbogus_key = 1\n");
    home.sp()
        .arg("fronting")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn profile_flag_selects_a_different_config_file() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    // The "work" profile has no config; the default one does.
    home.sp()
        .args(["--profile", "work", "cache", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("work.toml"));
}
