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

    let result = locator.custom_fronts(opts)?;
    if result.data.is_empty() {
        println!("No custom fronts.{}", stale_marker(result.freshness));
        return Ok(());
    }

    println!(
        "{} custom fronts{}:",
        result.data.len(),
        stale_marker(result.freshness)
    );
    for front in &result.data {
        let mut line = format!("  {}", front.name);
        if let Some(description) = &front.description {
            line.push_str(&format!(" - {}", description));
        }
        println!("{}", line);
    }
    Ok(())
}
