// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background connection management.
//!
//! Connection attempts (including the auth handshake) run in a spawned
//! task so the main loop stays responsive to IPC while the push
//! connection is down. The task retries forever with exponential backoff;
//! only a rejected token stops it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sp_api::{AuthOutcome, PushTransport, WebSocketPush};
use sp_core::protocol::AuthPayload;

use crate::status::{SharedStatus, STATE_CONNECTING, STATE_LIVE, STATE_STOPPED};

/// How long to wait for the service's auth response after connecting.
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Events sent from the connection task to the main loop.
pub enum ConnectionEvent {
    /// Connected and authenticated. Carries the live transport.
    Connected(Box<dyn PushTransport>),
    /// The token was rejected. Fatal; the daemon should stop.
    AuthRejected(String),
}

impl std::fmt::Debug for ConnectionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected(_) => f.debug_tuple("Connected").field(&"<transport>").finish(),
            Self::AuthRejected(reason) => {
                f.debug_tuple("AuthRejected").field(reason).finish()
            }
        }
    }
}

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Push endpoint URL.
    pub url: String,
    /// Token sent in the auth handshake.
    pub token: String,
    /// First retry delay (seconds); doubles per attempt.
    pub initial_delay_secs: u64,
    /// Backoff cap (seconds).
    pub max_delay_secs: u64,
}

/// Manages the background connection task.
pub struct ConnectionManager {
    config: ConnectionConfig,
    status: Arc<SharedStatus>,
    event_tx: mpsc::Sender<ConnectionEvent>,
    cancel_token: CancellationToken,
}

impl ConnectionManager {
    /// Create a manager and the receiver for its events.
    pub fn new(
        config: ConnectionConfig,
        status: Arc<SharedStatus>,
    ) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let manager = Self {
            config,
            status,
            event_tx,
            cancel_token: CancellationToken::new(),
        };
        (manager, event_rx)
    }

    /// Start a connection attempt in the background.
    pub fn spawn_connect_task(&self) {
        let config = self.config.clone();
        let status = Arc::clone(&self.status);
        let event_tx = self.event_tx.clone();
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            connect_with_retry(config, status, event_tx, cancel_token, || {
                Box::new(WebSocketPush::new())
            })
            .await;
        });
    }

    /// Cancel any pending connection attempts.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

/// Connection task: connect, authenticate, retry with backoff on
/// transient failures. Retries forever; auth rejection ends it.
async fn connect_with_retry<F>(
    config: ConnectionConfig,
    status: Arc<SharedStatus>,
    event_tx: mpsc::Sender<ConnectionEvent>,
    cancel_token: CancellationToken,
    mut make_transport: F,
) where
    F: FnMut() -> Box<dyn PushTransport>,
{
    let mut attempt = 0u32;
    let mut delay_secs = config.initial_delay_secs.max(1);

    loop {
        if cancel_token.is_cancelled() {
            return;
        }

        attempt = attempt.saturating_add(1);
        status.set(STATE_CONNECTING);
        status.set_attempt(attempt);

        let mut transport = make_transport();

        let connect_result = tokio::select! {
            _ = cancel_token.cancelled() => return,
            result = transport.connect(&config.url) => result,
        };

        let session = match connect_result {
            Ok(()) => authenticate(transport.as_mut(), &config.token).await,
            Err(e) => Err(HandshakeError::Transient(e.to_string())),
        };

        match session {
            Ok(()) => {
                status.set(STATE_LIVE);
                status.set_attempt(0);
                info!("push connection established");
                let _ = event_tx.send(ConnectionEvent::Connected(transport)).await;
                return;
            }
            Err(HandshakeError::Rejected(reason)) => {
                status.set(STATE_STOPPED);
                warn!("push authentication rejected: {}", reason);
                let _ = event_tx.send(ConnectionEvent::AuthRejected(reason)).await;
                return;
            }
            Err(HandshakeError::Transient(error)) => {
                warn!(attempt, delay_secs, "push connect failed: {}", error);
                tokio::select! {
                    _ = cancel_token.cancelled() => return,
                    _ = tokio::time::sleep(Duration::from_secs(delay_secs)) => {}
                }
                delay_secs = std::cmp::min(delay_secs.saturating_mul(2), config.max_delay_secs);
            }
        }
    }
}

enum HandshakeError {
    /// Worth retrying with backoff.
    Transient(String),
    /// Token refused; retrying cannot help.
    Rejected(String),
}

/// Send the auth payload and wait for the service's text verdict.
///
/// Frames that are neither verdict (early updates, pong noise) are
/// skipped; they will be re-fetched by the post-connect refresh.
async fn authenticate(
    transport: &mut dyn PushTransport,
    token: &str,
) -> std::result::Result<(), HandshakeError> {
    let payload = serde_json::to_string(&AuthPayload::new(token))
        .map_err(|e| HandshakeError::Transient(format!("auth payload: {}", e)))?;
    transport
        .send_text(payload)
        .await
        .map_err(|e| HandshakeError::Transient(e.to_string()))?;

    let verdict = tokio::time::timeout(AUTH_TIMEOUT, async {
        loop {
            match transport.recv_text().await {
                Ok(Some(text)) => {
                    if let Some(outcome) = AuthOutcome::classify(&text) {
                        return Ok(outcome);
                    }
                }
                Ok(None) => {
                    return Err(HandshakeError::Transient(
                        "connection closed during auth".to_string(),
                    ));
                }
                Err(e) => return Err(HandshakeError::Transient(e.to_string())),
            }
        }
    })
    .await
    .map_err(|_| HandshakeError::Transient("auth response timed out".to_string()))??;

    match verdict {
        AuthOutcome::Accepted => Ok(()),
        AuthOutcome::Rejected(reason) => Err(HandshakeError::Rejected(reason)),
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
