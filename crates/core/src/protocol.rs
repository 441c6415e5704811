// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-protocol message types for the remote service's update channel.
//!
//! The service delivers asynchronous change notifications as JSON text
//! frames over a persistent WebSocket:
//!
//! ```json
//! {
//!   "msg": "update",
//!   "target": "frontHistory",
//!   "results": [
//!     { "operationType": "insert", "id": "...", "content": { ... } }
//!   ]
//! }
//! ```
//!
//! This module parses the raw wire shape and reduces each result to a
//! [`PushEvent`] the daemon can apply. Unknown targets and non-update
//! messages are skipped, never errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keepalive the service expects: a literal text frame, not a WS ping.
pub const KEEPALIVE_TEXT: &str = "ping";

/// Interval between keepalive frames, in seconds.
pub const KEEPALIVE_INTERVAL_SECS: u64 = 10;

/// Collections the push channel reports changes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushTarget {
    /// Front-history records; the source of truth for current fronters.
    FrontHistory,
    Members,
    CustomFronts,
}

impl PushTarget {
    /// Parse the wire target name. Returns `None` for collections this
    /// system does not mirror (board messages, polls, ...).
    pub fn from_wire(target: &str) -> Option<Self> {
        match target {
            "frontHistory" => Some(PushTarget::FrontHistory),
            "members" => Some(PushTarget::Members),
            "customFronts" => Some(PushTarget::CustomFronts),
            _ => None,
        }
    }
}

/// Change operation carried by a push result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushOp {
    Insert,
    Update,
    Delete,
}

/// One applied change from the push channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    pub target: PushTarget,
    pub op: PushOp,
    /// Id of the changed record within its collection.
    pub id: String,
    /// New record value; absent for deletes.
    pub content: Option<Value>,
    /// Change timestamp used for reorder/duplicate suppression.
    pub ts: DateTime<Utc>,
}

/// Raw update message as received on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessage {
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub results: Vec<UpdateResult>,
}

/// One result within an [`UpdateMessage`].
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResult {
    #[serde(rename = "operationType")]
    pub operation_type: String,
    pub id: String,
    #[serde(default)]
    pub content: Option<Value>,
}

impl UpdateMessage {
    /// True for messages the daemon should apply (case-insensitive per
    /// the service's observed behaviour).
    pub fn is_update(&self) -> bool {
        self.msg.eq_ignore_ascii_case("update")
    }

    /// Reduce this message to applicable events, skipping results with
    /// unrecognized targets or operations. `received_at` stamps events
    /// whose content carries no timestamp of its own.
    pub fn into_events(self, received_at: DateTime<Utc>) -> Vec<PushEvent> {
        if !self.is_update() {
            return Vec::new();
        }
        let Some(target) = PushTarget::from_wire(&self.target) else {
            return Vec::new();
        };

        self.results
            .into_iter()
            .filter_map(|result| {
                let op = match result.operation_type.as_str() {
                    "insert" => PushOp::Insert,
                    "update" => PushOp::Update,
                    "delete" => PushOp::Delete,
                    _ => return None,
                };
                let ts = result
                    .content
                    .as_ref()
                    .and_then(content_timestamp)
                    .unwrap_or(received_at);
                Some(PushEvent {
                    target,
                    op,
                    id: result.id,
                    content: result.content,
                    ts,
                })
            })
            .collect()
    }
}

/// Extract a change timestamp from record content, if it carries one.
///
/// Front-history records carry `startTime`; member/custom-front records
/// carry `lastOperationTime` when the service provides it.
fn content_timestamp(content: &Value) -> Option<DateTime<Utc>> {
    let ms = content
        .get("lastOperationTime")
        .or_else(|| content.get("startTime"))
        .and_then(Value::as_i64)?;
    DateTime::<Utc>::from_timestamp_millis(ms)
}

/// Authentication payload sent as the first frame after connecting.
#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload<'a> {
    pub op: &'static str,
    pub token: &'a str,
}

impl<'a> AuthPayload<'a> {
    pub fn new(token: &'a str) -> Self {
        AuthPayload {
            op: "authenticate",
            token,
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
