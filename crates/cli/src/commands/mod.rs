// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cache;
pub mod custom_fronts;
pub mod daemon;
pub mod fronting;
pub mod members;
pub mod status;
pub mod switch;

use std::collections::HashMap;

use crate::locator::{Locator, QueryOptions};

/// Map `(custom, entity_id)` to a display name, best effort.
///
/// Fronter entries carry ids; names come from the member and custom
/// front directories. Reference data is fine stale here, and a lookup
/// failure just means ids are shown instead of names.
pub(crate) fn name_index(locator: &Locator, opts: QueryOptions) -> HashMap<(bool, String), String> {
    let opts = QueryOptions {
        accept_stale: true,
        ..opts
    };
    let mut index = HashMap::new();
    if let Ok(members) = locator.members(opts) {
        for m in members.data {
            index.insert((false, m.id), m.name);
        }
    }
    if let Ok(fronts) = locator.custom_fronts(opts) {
        for c in fronts.data {
            index.insert((true, c.id), c.name);
        }
    }
    index
}

/// Suffix appended to human output when data may be out of date.
pub(crate) fn stale_marker(freshness: crate::locator::Freshness) -> &'static str {
    if freshness.is_stale() {
        " (may be stale)"
    } else {
        ""
    }
}
