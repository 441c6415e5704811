// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::os::unix::net::UnixListener;
use std::path::Path;

use serde_json::json;
use tempfile::tempdir;

use sp_core::models::FrontEntry;
use sp_ipc::framing;

use crate::daemon::lifecycle;

use super::*;

/// Config pointing at a dead API endpoint so the direct tier fails fast,
/// with auto-start off so tests never spawn processes.
fn test_config() -> ProfileConfig {
    let toml = r#"
        token = "test-token"
        api_url = "http://127.0.0.1:1"
        api_timeout_secs = 1
        daemon_timeout_ms = 200
        auto_start_daemon = false
    "#;
    toml::from_str(toml).unwrap()
}

fn test_locator(state_dir: &Path, cache_dir: &Path) -> Locator {
    Locator::with_paths("test", test_config(), state_dir.to_path_buf(), cache_dir).unwrap()
}

fn sample_set() -> FronterSet {
    FronterSet {
        fronters: vec![FrontEntry {
            id: "h1".to_string(),
            entity_id: "alice".to_string(),
            custom: false,
            start_time: 100_000,
            live: true,
            custom_status: None,
        }],
        note: None,
        updated_at: None,
    }
}

/// Serve one IPC request on a background thread, like the daemon would.
fn fake_daemon(state_dir: &Path, response: DaemonResponse) -> std::thread::JoinHandle<()> {
    let listener = UnixListener::bind(lifecycle::socket_path(state_dir)).unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _request: DaemonRequest = framing::read_message(&mut stream).unwrap();
        framing::write_message(&mut stream, &response).unwrap();
    })
}

#[test]
fn daemon_tier_answers_first() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    let server = fake_daemon(
        state.path(),
        DaemonResponse::Fronters {
            set: sample_set(),
            freshness: sp_ipc::Freshness::Live,
        },
    );

    let result = locator.fronters(QueryOptions::default()).unwrap();
    server.join().unwrap();

    assert_eq!(result.source, Source::Daemon);
    assert_eq!(result.freshness, Freshness::Live);
    assert_eq!(result.data.fronters[0].entity_id, "alice");
}

#[test]
fn degraded_daemon_answers_are_marked_stale() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    let server = fake_daemon(
        state.path(),
        DaemonResponse::Fronters {
            set: sample_set(),
            freshness: sp_ipc::Freshness::Degraded,
        },
    );

    let result = locator.fronters(QueryOptions::default()).unwrap();
    server.join().unwrap();

    assert_eq!(result.freshness, Freshness::Degraded);
    assert!(result.freshness.is_stale());
}

#[test]
fn fresh_cache_answers_when_no_daemon() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    locator
        .cache()
        .put(Category::Fronters, serde_json::to_value(sample_set()).unwrap())
        .unwrap();

    let result = locator.fronters(QueryOptions::default()).unwrap();
    assert_eq!(result.source, Source::Cache);
    assert_eq!(result.freshness, Freshness::Fresh);
}

#[test]
fn stale_cache_is_returned_when_accepted() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    write_stale_entry(cache.path(), Category::Fronters, &sample_set());

    let result = locator
        .fronters(QueryOptions {
            accept_stale: true,
            ..QueryOptions::default()
        })
        .unwrap();
    assert_eq!(result.source, Source::Cache);
    assert_eq!(result.freshness, Freshness::Stale);
}

#[test]
fn stale_cache_is_the_last_resort_when_remote_fails() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    write_stale_entry(cache.path(), Category::Fronters, &sample_set());

    // Staleness not accepted up front, so the locator tries the (dead)
    // service first, then falls back to what it has.
    let result = locator.fronters(QueryOptions::default()).unwrap();
    assert_eq!(result.source, Source::Cache);
    assert_eq!(result.freshness, Freshness::Stale);
    assert_eq!(result.data.fronters.len(), 1);
}

#[test]
fn all_tiers_failing_is_a_single_no_data_error() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());

    match locator.fronters(QueryOptions::default()) {
        Err(Error::NoData { what, .. }) => assert_eq!(what, "fronters"),
        other => panic!("unexpected result: {:?}", other.map(|s| s.source)),
    }
}

#[test]
fn direct_options_skip_the_cache() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    locator
        .cache()
        .put(Category::Fronters, serde_json::to_value(sample_set()).unwrap())
        .unwrap();

    // Fresh cache exists, but direct mode must ignore it; with the API
    // unreachable that means an error, proving no tier was consulted.
    assert!(locator.fronters(QueryOptions::direct()).is_err());
}

#[test]
fn corrupt_cached_payload_falls_through() {
    let state = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let locator = test_locator(state.path(), cache.path());
    // Valid JSON, wrong shape for a FronterSet.
    locator
        .cache()
        .put(Category::Fronters, json!({ "bogus": true }))
        .unwrap();

    assert!(matches!(
        locator.fronters(QueryOptions::default()),
        Err(Error::NoData { .. })
    ));
}

/// Write a cache file whose fetched_at is old enough to be expired.
fn write_stale_entry<T: serde::Serialize>(cache_dir: &Path, category: Category, data: &T) {
    let entry = json!({
        "data": serde_json::to_value(data).unwrap(),
        "fetched_at": Utc::now() - chrono::Duration::hours(6),
        "ttl_secs": 300,
    });
    std::fs::write(
        cache_dir.join(format!("{}.json", category.as_str())),
        serde_json::to_vec(&entry).unwrap(),
    )
    .unwrap();
}
