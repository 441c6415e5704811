// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read commands driven entirely from the cache tier: no daemon is
//! running and the configured API endpoint refuses connections.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

fn seeded_home() -> TestHome {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);
    home.write_cache_entry(
        "members",
        serde_json::json!([
            { "id": "m1", "name": "Alice", "pronouns": "she/her" },
            { "id": "m2", "name": "Garnet" },
        ]),
        30,
        3600,
    );
    home.write_cache_entry(
        "custom_fronts",
        serde_json::json!([
            { "id": "c1", "name": "Stevonnie" },
        ]),
        30,
        3600,
    );
    home
}

fn fronters_payload(entries: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "fronters": entries })
}

#[test]
fn fronting_renders_cached_fronters() {
    let home = seeded_home();
    home.write_cache_entry(
        "fronters",
        fronters_payload(serde_json::json!([
            { "id": "h1", "member": "m1", "custom": false, "startTime": 1000, "live": true },
        ])),
        30,
        300,
    );

    home.sp()
        .arg("fronting")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currently fronting:"))
        .stdout(predicate::str::contains("Alice"));
}

#[test]
fn fronting_marks_custom_fronts() {
    let home = seeded_home();
    home.write_cache_entry(
        "fronters",
        fronters_payload(serde_json::json!([
            { "id": "h2", "member": "c1", "custom": true, "startTime": 1000, "live": true },
        ])),
        30,
        300,
    );

    home.sp()
        .arg("fronting")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stevonnie [custom]"));
}

#[test]
fn fronting_reports_nobody_fronting() {
    let home = seeded_home();
    home.write_cache_entry("fronters", fronters_payload(serde_json::json!([])), 30, 300);

    home.sp()
        .arg("fronting")
        .assert()
        .success()
        .stdout(predicate::str::contains("No one is currently fronting."));
}

#[test]
fn stale_cache_is_served_when_the_api_is_down() {
    let home = seeded_home();
    // Past its TTL; the direct tier can't refresh it, so it comes back
    // marked stale rather than failing.
    home.write_cache_entry(
        "fronters",
        fronters_payload(serde_json::json!([
            { "id": "h1", "member": "m1", "custom": false, "startTime": 1000, "live": true },
        ])),
        7200,
        300,
    );

    home.sp()
        .arg("fronting")
        .assert()
        .success()
        .stdout(predicate::str::contains("may be stale"))
        .stdout(predicate::str::contains("Alice"));
}

#[test]
fn fronting_fails_when_every_tier_is_empty() {
    let home = TestHome::new();
    home.write_config(OFFLINE_CONFIG);

    home.sp()
        .arg("fronting")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no fronters available"));
}

#[test]
fn prompt_mode_is_one_line() {
    let home = seeded_home();
    home.write_cache_entry(
        "fronters",
        fronters_payload(serde_json::json!([
            { "id": "h1", "member": "m1", "custom": false, "startTime": 2000, "live": true },
            { "id": "h2", "member": "c1", "custom": true, "startTime": 1000, "live": true },
        ])),
        30,
        300,
    );

    home.sp()
        .args(["fronting", "--prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice, Stevonnie*"));
}

#[test]
fn prompt_mode_prints_none_when_empty() {
    let home = seeded_home();
    home.write_cache_entry("fronters", fronters_payload(serde_json::json!([])), 30, 300);

    home.sp()
        .args(["fronting", "--prompt"])
        .assert()
        .success()
        .stdout(predicate::str::diff("none\n"));
}

#[test]
fn members_lists_cached_members() {
    let home = seeded_home();
    home.sp()
        .arg("members")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("she/her"))
        .stdout(predicate::str::contains("Garnet"));
}

#[test]
fn custom_fronts_lists_cached_fronts() {
    let home = seeded_home();
    home.sp()
        .arg("custom-fronts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stevonnie"));
}

#[test]
fn no_daemon_flag_skips_the_cache() {
    let home = seeded_home();
    // Fresh cached fronters exist, but --no-daemon goes straight to the
    // (unreachable) API.
    home.write_cache_entry(
        "fronters",
        fronters_payload(serde_json::json!([
            { "id": "h1", "member": "m1", "custom": false, "startTime": 1000, "live": true },
        ])),
        30,
        300,
    );

    home.sp()
        .args(["fronting", "--no-daemon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no fronters available"));
}

#[test]
fn switch_rejects_unknown_names() {
    let home = seeded_home();
    home.sp()
        .args(["switch", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no member or custom front named 'Nobody'",
        ));
}

#[test]
fn switch_fails_cleanly_when_the_api_is_down() {
    let home = seeded_home();
    home.sp().args(["switch", "Alice"]).assert().failure();
}
