// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::stale_marker;
use crate::error::Result;
use crate::locator::{Locator, QueryOptions};

pub fn run(profile: &str, no_daemon: bool) -> Result<()> {
    let locator = Locator::open(profile)?;
    let opts = if no_daemon {
        QueryOptions::direct()
    } else {
        QueryOptions::default()
    };

    let result = locator.members(opts)?;
    if result.data.is_empty() {
        println!("No members.{}", stale_marker(result.freshness));
        return Ok(());
    }

    println!(
        "{} members{}:",
        result.data.len(),
        stale_marker(result.freshness)
    );
    for member in &result.data {
        let mut line = format!("  {}", member.name);
        if let Some(pronouns) = &member.pronouns {
            line.push_str(&format!(" ({})", pronouns));
        }
        println!("{}", line);
    }
    Ok(())
}
