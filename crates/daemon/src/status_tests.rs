// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use yare::parameterized;

use super::*;

#[parameterized(
    starting = { STATE_STARTING, "starting" },
    live = { STATE_LIVE, "live" },
    degraded = { STATE_DEGRADED, "degraded" },
    stopped = { STATE_STOPPED, "stopped" },
)]
fn status_string_for_state(state: u8, expected: &str) {
    let status = SharedStatus::new();
    status.set(state);
    assert_eq!(status.status_string(), expected);
}

#[test]
fn connecting_shows_attempt_after_first() {
    let status = SharedStatus::new();
    status.set(STATE_CONNECTING);
    status.set_attempt(1);
    assert_eq!(status.status_string(), "connecting");
    status.set_attempt(4);
    assert_eq!(status.status_string(), "connecting (attempt 4)");
}

#[test]
fn starts_in_starting_state() {
    let status = SharedStatus::new();
    assert_eq!(status.get(), STATE_STARTING);
    assert_eq!(status.attempt(), 0);
    assert!(status.stop_reason().is_none());
}

#[test]
fn record_stop_sets_state_and_reason() {
    let status = SharedStatus::new();
    status.set(STATE_LIVE);
    status.record_stop("authentication rejected");
    assert_eq!(status.get(), STATE_STOPPED);
    assert_eq!(
        status.stop_reason().as_deref(),
        Some("authentication rejected")
    );
}

#[test]
fn is_live_only_in_live_state() {
    let status = SharedStatus::new();
    assert!(!status.is_live());
    status.set(STATE_LIVE);
    assert!(status.is_live());
    status.set(STATE_DEGRADED);
    assert!(!status.is_live());
}
