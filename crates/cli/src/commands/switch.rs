// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sp_core::models::{CustomFront, Member, Switch};

use crate::error::{Error, Result};
use crate::locator::{Locator, QueryOptions};

pub fn run(profile: &str, names: Vec<String>, note: Option<String>) -> Result<()> {
    let locator = Locator::open(profile)?;

    // Reference data may be stale; names change rarely and a bad id is
    // rejected by the service anyway.
    let opts = QueryOptions {
        accept_stale: true,
        ..QueryOptions::default()
    };
    let members = locator.members(opts)?.data;
    let custom_fronts = locator.custom_fronts(opts)?.data;

    let mut switch = Switch {
        members: Vec::new(),
        custom_fronts: Vec::new(),
        note,
    };
    let mut resolved_names = Vec::new();
    for name in &names {
        match resolve(name, &members, &custom_fronts) {
            Some((false, id, display)) => {
                switch.members.push(id);
                resolved_names.push(display);
            }
            Some((true, id, display)) => {
                switch.custom_fronts.push(id);
                resolved_names.push(format!("{} [custom]", display));
            }
            None => return Err(Error::UnknownEntity(name.clone())),
        }
    }

    locator.register_switch(&switch)?;
    println!("Switch registered: {}", resolved_names.join(", "));
    Ok(())
}

/// Resolve a name to `(is_custom, id, display_name)`. Exact match first,
/// then case-insensitive; members shadow custom fronts on a tie.
fn resolve(
    name: &str,
    members: &[Member],
    custom_fronts: &[CustomFront],
) -> Option<(bool, String, String)> {
    if let Some(m) = members.iter().find(|m| m.name == name) {
        return Some((false, m.id.clone(), m.name.clone()));
    }
    if let Some(c) = custom_fronts.iter().find(|c| c.name == name) {
        return Some((true, c.id.clone(), c.name.clone()));
    }

    let lower = name.to_lowercase();
    if let Some(m) = members.iter().find(|m| m.name.to_lowercase() == lower) {
        return Some((false, m.id.clone(), m.name.clone()));
    }
    if let Some(c) = custom_fronts
        .iter()
        .find(|c| c.name.to_lowercase() == lower)
    {
        return Some((true, c.id.clone(), c.name.clone()));
    }
    None
}

#[cfg(test)]
#[path = "switch_tests.rs"]
mod tests;
