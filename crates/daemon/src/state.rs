// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory mirror of the remote fronting state.
//!
//! Collections are keyed by record id, and every record carries the
//! timestamp of the push event that last touched it. An incoming event
//! whose timestamp is not newer than the stored one is dropped, which
//! makes duplicated and reordered deliveries harmless. Seeded records
//! get the epoch timestamp so the first push for them always applies.
//!
//! The visible [`FronterSet`] is rebuilt from live history entries after
//! every front-history change and swapped in whole; readers clone it and
//! never observe a half-applied update.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use sp_core::models::{CustomFront, FrontEntry, FronterSet, Member};
use sp_core::protocol::{PushEvent, PushOp, PushTarget};

/// A mirrored record plus the event timestamp that produced it.
#[derive(Debug, Clone)]
struct Tracked<T> {
    record: T,
    ts: DateTime<Utc>,
}

fn seed_ts() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// The daemon's whole mirrored state.
#[derive(Debug, Default)]
pub struct DaemonState {
    entries: HashMap<String, Tracked<FrontEntry>>,
    members: HashMap<String, Tracked<Member>>,
    custom_fronts: HashMap<String, Tracked<CustomFront>>,
    fronters: FronterSet,
    pub last_push: Option<DateTime<Utc>>,
    pub update_count: u64,
}

impl DaemonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the front-history mirror from a bulk load.
    pub fn seed_fronters(&mut self, entries: Vec<FrontEntry>, now: DateTime<Utc>) {
        self.entries = entries
            .into_iter()
            .map(|e| {
                (
                    e.id.clone(),
                    Tracked {
                        record: e,
                        ts: seed_ts(),
                    },
                )
            })
            .collect();
        self.rebuild_fronters(now);
    }

    /// Replace the member mirror from a bulk load.
    pub fn seed_members(&mut self, members: Vec<Member>) {
        self.members = members
            .into_iter()
            .map(|m| {
                (
                    m.id.clone(),
                    Tracked {
                        record: m,
                        ts: seed_ts(),
                    },
                )
            })
            .collect();
    }

    /// Replace the custom-front mirror from a bulk load.
    pub fn seed_custom_fronts(&mut self, custom_fronts: Vec<CustomFront>) {
        self.custom_fronts = custom_fronts
            .into_iter()
            .map(|c| {
                (
                    c.id.clone(),
                    Tracked {
                        record: c,
                        ts: seed_ts(),
                    },
                )
            })
            .collect();
    }

    /// Apply one push event. Returns the target that changed, or `None`
    /// when the event was dropped (stale ts, malformed content).
    pub fn apply_event(&mut self, event: &PushEvent) -> Option<PushTarget> {
        let applied = match event.target {
            PushTarget::FrontHistory => self.apply_front_history(event),
            PushTarget::Members => {
                apply_to_map(&mut self.members, event, |content| {
                    parse_record::<Member>(&event.id, content)
                })
            }
            PushTarget::CustomFronts => {
                apply_to_map(&mut self.custom_fronts, event, |content| {
                    parse_record::<CustomFront>(&event.id, content)
                })
            }
        };

        if !applied {
            return None;
        }

        if event.target == PushTarget::FrontHistory {
            self.rebuild_fronters(Utc::now());
        }
        self.update_count += 1;
        self.last_push = Some(Utc::now());
        Some(event.target)
    }

    fn apply_front_history(&mut self, event: &PushEvent) -> bool {
        apply_to_map(&mut self.entries, event, |content| {
            parse_record::<FrontEntry>(&event.id, content)
        })
    }

    fn rebuild_fronters(&mut self, now: DateTime<Utc>) {
        let live: Vec<FrontEntry> = self
            .entries
            .values()
            .map(|t| t.record.clone())
            .collect();
        self.fronters = FronterSet::from_live_entries(live, now);
    }

    /// Snapshot of the current fronter set.
    pub fn fronter_set(&self) -> FronterSet {
        self.fronters.clone()
    }

    /// Member directory, sorted by name for stable output.
    pub fn members(&self) -> Vec<Member> {
        let mut members: Vec<Member> =
            self.members.values().map(|t| t.record.clone()).collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// Custom fronts, sorted by name.
    pub fn custom_fronts(&self) -> Vec<CustomFront> {
        let mut fronts: Vec<CustomFront> = self
            .custom_fronts
            .values()
            .map(|t| t.record.clone())
            .collect();
        fronts.sort_by(|a, b| a.name.cmp(&b.name));
        fronts
    }

    pub fn fronter_count(&self) -> usize {
        self.fronters.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn custom_front_count(&self) -> usize {
        self.custom_fronts.len()
    }
}

/// Upsert/delete one record with the timestamp gate.
fn apply_to_map<T>(
    map: &mut HashMap<String, Tracked<T>>,
    event: &PushEvent,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> bool {
    if let Some(existing) = map.get(&event.id) {
        if event.ts <= existing.ts {
            debug!(id = %event.id, "dropping stale push event");
            return false;
        }
    }

    match event.op {
        PushOp::Insert | PushOp::Update => {
            let Some(content) = event.content.as_ref() else {
                warn!(id = %event.id, "push event without content");
                return false;
            };
            let Some(record) = parse(content) else {
                return false;
            };
            // Unknown ids insert; the mirror converges on whatever the
            // service reports.
            map.insert(
                event.id.clone(),
                Tracked {
                    record,
                    ts: event.ts,
                },
            );
            true
        }
        PushOp::Delete => map.remove(&event.id).is_some(),
    }
}

/// Deserialize event content with the record id merged in.
fn parse_record<T: serde::de::DeserializeOwned>(id: &str, content: &Value) -> Option<T> {
    let Value::Object(map) = content else {
        warn!(%id, "push content is not an object");
        return None;
    };
    let mut map = map.clone();
    map.insert("id".to_string(), Value::String(id.to_string()));
    match serde_json::from_value(Value::Object(map)) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(%id, "malformed push content: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
