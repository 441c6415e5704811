// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `sp cache info` and `sp cache clear` against a seeded cache dir.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

fn members_payload() -> serde_json::Value {
    serde_json::json!([
        { "id": "m1", "name": "Alice" },
        { "id": "m2", "name": "Garnet", "pronouns": "she/her" },
    ])
}

#[test]
fn info_on_empty_cache() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.sp()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty."));
}

#[test]
fn info_reports_fresh_entries() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.write_cache_entry("members", members_payload(), 30, 3600);
    home.sp()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("members: fresh"));
}

#[test]
fn info_reports_expired_entries() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.write_cache_entry("members", members_payload(), 7200, 60);
    home.sp()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("members: expired"));
}

#[test]
fn clear_removes_entries() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.write_cache_entry("members", members_payload(), 30, 3600);
    home.write_cache_entry("fronters", serde_json::json!({ "fronters": [] }), 30, 300);

    home.sp()
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared."));

    assert!(!home.cache_dir().join("members.json").exists());
    assert!(!home.cache_dir().join("fronters.json").exists());

    home.sp()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty."));
}

#[test]
fn corrupt_entry_is_ignored() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    std::fs::create_dir_all(home.cache_dir()).unwrap();
    std::fs::write(home.cache_dir().join("members.json"), "{not json").unwrap();

    home.sp()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty."));
}
