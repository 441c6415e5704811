// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use yare::parameterized;

use super::format_duration;

#[parameterized(
    zero = { 0, "0s" },
    seconds = { 59, "59s" },
    minutes = { 61, "1m1s" },
    exact_minute = { 120, "2m0s" },
    hours = { 3720, "1h2m" },
    days_as_hours = { 90_000, "25h0m" },
)]
fn durations_format_compactly(secs: u64, expected: &str) {
    assert_eq!(format_duration(secs), expected);
}
