// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Daemon failure modes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] sp_core::Error),

    #[error(transparent)]
    Api(#[from] sp_api::Error),

    /// The push handshake was refused. Reconnecting will not help; the
    /// daemon records the reason and exits.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    #[error("another daemon instance is already running")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, Error>;
