// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::CacheCommand;
use crate::commands::status::format_duration;
use crate::error::Result;
use crate::locator::Locator;

pub fn run(profile: &str, command: CacheCommand) -> Result<()> {
    let locator = Locator::open(profile)?;

    match command {
        CacheCommand::Info => {
            let entries = locator.cache().entry_info();
            if entries.is_empty() {
                println!("Cache is empty.");
                return Ok(());
            }
            for info in entries {
                let state = if info.expired { "expired" } else { "fresh" };
                let tier = if info.in_memory { ", in memory" } else { "" };
                println!(
                    "{}: {} (age {}, ttl {}, {} bytes{})",
                    info.category,
                    state,
                    format_duration(info.age_secs),
                    format_duration(info.ttl_secs),
                    info.file_size,
                    tier
                );
            }
            Ok(())
        }
        CacheCommand::Clear => {
            locator.cache().clear_all();
            println!("Cache cleared.");
            Ok(())
        }
    }
}
