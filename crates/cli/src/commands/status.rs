// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::daemon::lifecycle;
use crate::error::Result;
use crate::locator::Locator;

pub fn run(profile: &str) -> Result<()> {
    let locator = Locator::open(profile)?;
    println!("Profile: {}", profile);

    match lifecycle::daemon_status(locator.state_dir())? {
        Some(status) => {
            println!("Daemon: running (pid {})", status.pid);
            println!("  uptime:     {}", format_duration(status.uptime_secs));
            println!("  connection: {}", status.connection);
            if status.reconnect_attempt > 0 {
                println!("  reconnect:  attempt {}", status.reconnect_attempt);
            }
            match status.last_push {
                Some(ts) => println!("  last push:  {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
                None => println!("  last push:  never"),
            }
            println!(
                "  mirror:     {} fronters, {} members, {} custom fronts",
                status.fronter_count, status.member_count, status.custom_front_count
            );
            println!("  updates:    {}", status.update_count);
        }
        None => {
            println!("Daemon: not running");
            if let Some(reason) = lifecycle::last_error(locator.state_dir()) {
                println!("  last error: {}", reason);
            }
        }
    }

    println!("Cache:");
    let entries = locator.cache().entry_info();
    if entries.is_empty() {
        println!("  empty");
    }
    for info in entries {
        let state = if info.expired { "expired" } else { "fresh" };
        println!(
            "  {}: {} (age {}, ttl {})",
            info.category,
            state,
            format_duration(info.age_secs),
            format_duration(info.ttl_secs)
        );
    }
    Ok(())
}

/// Compact human duration, largest two units.
pub(crate) fn format_duration(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
