// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn status_with_nothing_running_and_an_empty_cache() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);

    home.sp()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile: default"))
        .stdout(predicate::str::contains("Daemon: not running"))
        .stdout(predicate::str::contains("Cache:"))
        .stdout(predicate::str::contains("empty"));
}

#[test]
fn status_lists_cache_entries() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.write_cache_entry("members", serde_json::json!([]), 30, 3600);

    home.sp()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("members: fresh"));
}
