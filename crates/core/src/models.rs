// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Data model for fronting state.
//!
//! Field names follow the remote service's camelCase JSON so the same
//! types deserialize from REST responses, push-update contents, and the
//! persisted cache without translation layers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates members from custom fronts wherever both can appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A persistent, named identity.
    Member,
    /// An alternate fronting identity distinct from a member.
    CustomFront,
}

impl EntityKind {
    /// Returns the string representation used in display and cache files.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Member => "member",
            EntityKind::CustomFront => "custom_front",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "member" => Ok(EntityKind::Member),
            "custom_front" | "custom" => Ok(EntityKind::CustomFront),
            other => Err(format!("invalid entity kind: '{}'", other)),
        }
    }
}

/// A persistent system member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Remote-assigned identifier.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(default, rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// An alternate fronting identity. Same shape as [`Member`] but kept as a
/// distinct type so lookups can never confuse the two id namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFront {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(default, rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// One front-history record as the remote service reports it.
///
/// `live == true` means the entity is currently fronting; ended entries
/// stay in the history with `live == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontEntry {
    /// History record id (not the entity id).
    pub id: String,
    /// Id of the fronting member or custom front.
    #[serde(rename = "member")]
    pub entity_id: String,
    /// True when `entity_id` refers to a custom front.
    #[serde(default)]
    pub custom: bool,
    /// Front start time, milliseconds since epoch.
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status: Option<String>,
}

impl FrontEntry {
    /// The kind of entity this entry refers to.
    pub fn kind(&self) -> EntityKind {
        if self.custom {
            EntityKind::CustomFront
        } else {
            EntityKind::Member
        }
    }
}

/// The set of entities currently fronting.
///
/// Ordering is most-recent-switch-first (descending start time). This
/// layer does not deduplicate; the remote service is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FronterSet {
    pub fronters: Vec<FrontEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When this view was last brought in line with the remote.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FronterSet {
    /// Build a set from live history entries, sorted most-recent-first.
    pub fn from_live_entries(mut entries: Vec<FrontEntry>, updated_at: DateTime<Utc>) -> Self {
        entries.retain(|e| e.live);
        entries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        FronterSet {
            fronters: entries,
            note: None,
            updated_at: Some(updated_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fronters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fronters.len()
    }
}

/// Switch-registration payload sent to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    /// Member ids going to front.
    pub members: Vec<String>,
    /// Custom front ids going to front.
    pub custom_fronts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
