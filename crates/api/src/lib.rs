// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-service gateway: REST client and WebSocket push transport.
//!
//! Everything that talks to the network lives here, behind two seams:
//! [`RestClient`] for request/response fetches and the [`PushTransport`]
//! trait for the daemon's long-lived push connection, so the daemon loop
//! can be driven by a mock transport in tests.

mod error;
mod push;
mod rest;

pub use error::{Error, Result};
pub use push::{AuthOutcome, PushTransport, WebSocketPush};
pub use rest::RestClient;
