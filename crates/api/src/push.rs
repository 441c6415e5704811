// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push transport for the daemon's long-lived WebSocket connection.
//!
//! The service speaks JSON text frames end to end: the client
//! authenticates with a JSON payload, keeps the connection alive with a
//! literal `"ping"` text message, and receives updates as JSON text.
//! The transport stays at the text level; framing into protocol types
//! happens in the daemon.

use std::future::Future;
use std::pin::Pin;

use crate::error::{Error, Result};

/// Outcome of the service's text reply to an authenticate payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Token accepted; updates will follow.
    Accepted,
    /// Token rejected. Reconnecting will not help.
    Rejected(String),
}

impl AuthOutcome {
    /// Classify a text frame as an auth response, or `None` when it is
    /// an ordinary message.
    pub fn classify(text: &str) -> Option<AuthOutcome> {
        if text.contains("Successfully authenticated") {
            Some(AuthOutcome::Accepted)
        } else if text.contains("Authentication violation") {
            Some(AuthOutcome::Rejected(text.to_string()))
        } else {
            None
        }
    }
}

/// Transport trait for the push connection.
///
/// Abstracts the WebSocket so the connection manager can be driven by a
/// mock transport in tests.
pub trait PushTransport: Send {
    /// Connect to the push endpoint.
    fn connect(&mut self, url: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Close the connection.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Send a text frame.
    fn send_text(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Receive the next text frame.
    ///
    /// Returns `None` if the connection closed cleanly.
    fn recv_text(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketPush {
    ws: Option<WebSocketConnection>,
}

struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        tokio_tungstenite::tungstenite::Message,
    >,
    stream: futures_util::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    >,
}

impl WebSocketPush {
    pub fn new() -> Self {
        WebSocketPush { ws: None }
    }
}

impl Default for WebSocketPush {
    fn default() -> Self {
        Self::new()
    }
}

impl PushTransport for WebSocketPush {
    fn connect(&mut self, url: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            use futures_util::StreamExt;

            let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| Error::PushConnect(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }

    fn send_text(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self
                .ws
                .as_mut()
                .ok_or_else(|| Error::PushLost("not connected".to_string()))?;

            let sent = match ws.sink.send(Message::Text(text.into())).await {
                // Flush so broken connections surface here, not on recv.
                Ok(()) => ws.sink.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = sent {
                // A failed send leaves the sink in an unknown state;
                // drop the connection rather than reuse it.
                self.ws = None;
                return Err(Error::PushLost(e.to_string()));
            }
            Ok(())
        })
    }

    fn recv_text(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            // Borrows rather than takes the connection: callers poll
            // this future inside a select loop, and a losing branch is
            // dropped mid-receive. Cancellation must leave the
            // connection usable for the next poll.
            let ws = self
                .ws
                .as_mut()
                .ok_or_else(|| Error::PushLost("not connected".to_string()))?;

            let ended = loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Some(text.to_string()));
                    }
                    Some(Ok(Message::Close(_))) => break Ok(None),
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                        continue;
                    }
                    Some(Ok(_)) => {
                        // Binary frames are not part of the protocol.
                        continue;
                    }
                    Some(Err(e)) => break Err(Error::PushLost(e.to_string())),
                    None => break Ok(None),
                }
            };
            self.ws = None;
            ended
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
