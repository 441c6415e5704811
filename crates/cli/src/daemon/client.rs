// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! IPC client for communicating with the spd daemon.
//!
//! Blocking, one request/response pair per connection. Timeouts keep a
//! dead or wedged daemon from hanging the CLI; the locator treats any
//! error here as "daemon unreachable" and falls through to the cache.

use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use sp_ipc::{framing, DaemonRequest, DaemonResponse};

use crate::error::{Error, Result};

/// A client connection to the daemon.
pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    /// Connect to the daemon socket with the given I/O timeout.
    pub fn connect(socket_path: &Path, timeout: Duration) -> Result<Self> {
        let stream = UnixStream::connect(socket_path)
            .map_err(|e| Error::Daemon(format!("failed to connect to daemon: {}", e)))?;

        stream
            .set_read_timeout(Some(timeout))
            .map_err(|e| Error::Daemon(format!("failed to set read timeout: {}", e)))?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(|e| Error::Daemon(format!("failed to set write timeout: {}", e)))?;

        Ok(DaemonClient { stream })
    }

    /// Send one request and read its response.
    pub fn request(&mut self, request: &DaemonRequest) -> Result<DaemonResponse> {
        framing::write_message(&mut self.stream, request)?;
        let response = framing::read_message(&mut self.stream)?;
        match response {
            DaemonResponse::Error { message } => Err(Error::Daemon(message)),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
