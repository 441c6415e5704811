// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use yare::parameterized;

use super::*;

#[parameterized(
    accepted = { "Successfully authenticated", Some(AuthOutcome::Accepted) },
    accepted_in_envelope = { "{\"msg\": \"Successfully authenticated\"}", Some(AuthOutcome::Accepted) },
    update = { "{\"msg\": \"update\", \"target\": \"members\", \"results\": []}", None },
    ping_reply = { "pong", None },
    empty = { "", None },
)]
fn classify_auth_text(text: &str, expected: Option<AuthOutcome>) {
    assert_eq!(AuthOutcome::classify(text), expected);
}

#[test]
fn rejected_outcome_carries_the_message() {
    let outcome = AuthOutcome::classify("Authentication violation: token revoked").unwrap();
    match outcome {
        AuthOutcome::Rejected(message) => assert!(message.contains("revoked")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn disconnected_transport_reports_not_connected() {
    let transport = WebSocketPush::new();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn send_on_disconnected_transport_fails() {
    let mut transport = WebSocketPush::new();
    let err = transport.send_text("ping".to_string()).await.unwrap_err();
    assert!(matches!(err, Error::PushLost(_)));
}

#[tokio::test]
async fn recv_on_disconnected_transport_fails() {
    let mut transport = WebSocketPush::new();
    let err = transport.recv_text().await.unwrap_err();
    assert!(matches!(err, Error::PushLost(_)));
}

#[tokio::test]
async fn disconnect_is_idempotent() {
    let mut transport = WebSocketPush::new();
    transport.disconnect().await.unwrap();
    transport.disconnect().await.unwrap();
}

#[tokio::test]
async fn dropped_recv_future_keeps_the_connection() {
    use std::time::Duration;

    use futures_util::SinkExt;
    use tokio_tungstenite::tungstenite::Message;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        ws.send(Message::Text("hello".into())).await.unwrap();
    });

    let mut transport = WebSocketPush::new();
    transport.connect(&format!("ws://{}", addr)).await.unwrap();

    // Poll a receive future and drop it before any frame arrives, the
    // way a select loop drops its losing branches every iteration.
    tokio::select! {
        biased;
        _ = tokio::time::sleep(Duration::from_millis(20)) => {}
        frame = transport.recv_text() => panic!("unexpected frame: {:?}", frame),
    }

    assert!(transport.is_connected());
    let frame = transport.recv_text().await.unwrap();
    assert_eq!(frame.as_deref(), Some("hello"));
    server.await.unwrap();
}
