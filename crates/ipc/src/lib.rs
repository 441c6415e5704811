// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared IPC protocol for CLI-daemon communication.
//!
//! This crate defines the message types and framing protocol used between
//! the `sp` CLI and the `spd` daemon. Messages are serialized as JSON
//! with length-prefixed framing over the profile's unix socket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sp_core::models::{CustomFront, FronterSet, Member};

/// Whether the daemon answered from a live push connection or from its
/// last-known mirror while the connection is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Push connection is up; the mirror tracks the remote service.
    Live,
    /// Push connection is down; data is the last state seen before the
    /// drop plus whatever the cache held at startup.
    Degraded,
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Live => "live",
            Freshness::Degraded => "degraded",
        }
    }
}

/// Request sent from CLI to daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonRequest {
    /// Ping to check if daemon is alive.
    Ping,
    /// Get daemon status.
    Status,
    /// Current fronters from the in-memory mirror.
    GetFronters,
    /// Member directory from the in-memory mirror.
    GetMembers,
    /// Custom fronts from the in-memory mirror.
    GetCustomFronts,
    /// Graceful shutdown.
    Shutdown,
}

/// Response sent from daemon to CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonResponse {
    /// Pong response.
    Pong,
    /// Status response.
    Status(DaemonStatus),
    /// Current fronter set.
    Fronters {
        set: FronterSet,
        freshness: Freshness,
    },
    /// Member directory.
    Members {
        members: Vec<Member>,
        freshness: Freshness,
    },
    /// Custom fronts.
    CustomFronts {
        custom_fronts: Vec<CustomFront>,
        freshness: Freshness,
    },
    /// Shutdown acknowledged.
    ShuttingDown,
    /// Error response.
    Error { message: String },
}

/// Daemon status information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonStatus {
    /// Current daemon PID.
    pub pid: u32,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Connection state ("starting", "connecting", "live", "degraded").
    pub connection: String,
    /// Reconnect attempts since the connection last dropped.
    pub reconnect_attempt: u32,
    /// When the last push message was applied, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_push: Option<DateTime<Utc>>,
    /// Entries currently in the fronter set.
    pub fronter_count: usize,
    /// Members in the mirror.
    pub member_count: usize,
    /// Custom fronts in the mirror.
    pub custom_front_count: usize,
    /// Push updates applied since startup.
    pub update_count: u64,
}

// ============================================================================
// Message framing
// ============================================================================

/// Maximum message size (1MB) to prevent malformed messages from causing hangs.
const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Blocking IPC message framing, used by the CLI side.
///
/// Messages are framed as:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded message
pub mod framing {
    use std::io::{Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use super::MAX_MESSAGE_SIZE;

    /// Write a serializable message to the given writer.
    pub fn write_message<W: Write, T: Serialize>(
        writer: &mut W,
        message: &T,
    ) -> std::io::Result<()> {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a deserializable message from the given reader.
    pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> std::io::Result<T> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;

        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }
}

/// Async framing with the same wire shape, used by the daemon side.
pub mod framing_async {
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

    use super::MAX_MESSAGE_SIZE;

    /// Write a serializable message to the given async writer.
    pub async fn write_message<W, T>(writer: &mut W, message: &T) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
        T: Serialize,
    {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes()).await?;
        writer.write_all(&json).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Read a deserializable message from the given async reader.
    pub async fn read_message<R, T>(reader: &mut R) -> std::io::Result<T>
    where
        R: AsyncRead + Unpin,
        T: DeserializeOwned,
    {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf).await?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).await?;

        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
