// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::{name_index, stale_marker};
use crate::error::Result;
use crate::locator::{Locator, QueryOptions};

pub fn run(profile: &str, no_daemon: bool, prompt: bool) -> Result<()> {
    let locator = Locator::open(profile)?;
    let opts = if no_daemon {
        QueryOptions::direct()
    } else {
        QueryOptions {
            // The prompt path favors speed over freshness.
            accept_stale: prompt,
            ..QueryOptions::default()
        }
    };

    let result = locator.fronters(opts)?;
    let names = name_index(&locator, opts);
    let display = |custom: bool, id: &str| -> String {
        names
            .get(&(custom, id.to_string()))
            .cloned()
            .unwrap_or_else(|| id.to_string())
    };

    if prompt {
        if result.data.is_empty() {
            println!("none");
            return Ok(());
        }
        let line: Vec<String> = result
            .data
            .fronters
            .iter()
            .map(|e| {
                let mut name = display(e.custom, &e.entity_id);
                if e.custom {
                    name.push('*');
                }
                name
            })
            .collect();
        let marker = if result.freshness.is_stale() { "~" } else { "" };
        println!("{}{}", line.join(", "), marker);
        return Ok(());
    }

    if result.data.is_empty() {
        println!("No one is currently fronting.{}", stale_marker(result.freshness));
        return Ok(());
    }

    println!("Currently fronting{}:", stale_marker(result.freshness));
    for entry in &result.data.fronters {
        let mut line = format!("  {}", display(entry.custom, &entry.entity_id));
        if entry.custom {
            line.push_str(" [custom]");
        }
        if let Some(status) = &entry.custom_status {
            line.push_str(&format!(" - {}", status));
        }
        println!("{}", line);
    }
    if let Some(note) = &result.data.note {
        println!("Note: {}", note);
    }
    Ok(())
}
