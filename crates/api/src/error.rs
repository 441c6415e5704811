// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failure modes of the remote-service gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// Token rejected or missing write permission (HTTP 401/403, or a
    /// refused push handshake).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Rate limited by the service. Includes retry-after in seconds.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Non-auth HTTP error from the service.
    #[error("api error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// WebSocket connection failed.
    #[error("push connection failed: {0}")]
    PushConnect(String),

    /// WebSocket closed or errored mid-session.
    #[error("push connection lost: {0}")]
    PushLost(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when re-authentication (a new token) is the only fix; the
    /// daemon treats these as fatal rather than retrying.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// True for errors worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::RateLimited { .. } => true,
            Error::PushConnect(_) | Error::PushLost(_) => true,
            _ => false,
        }
    }
}
