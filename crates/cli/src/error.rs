// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors surfaced by the sprs library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] sp_core::Error),

    #[error(transparent)]
    Api(#[from] sp_api::Error),

    #[error("daemon error: {0}")]
    Daemon(String),

    #[error("failed to start daemon: {0}")]
    DaemonStart(String),

    #[error("no member or custom front named '{0}'\n  hint: 'sp members' and 'sp custom-fronts' list the known names")]
    UnknownEntity(String),

    /// Every fallback tier failed and no stale data was left to offer.
    #[error("no {what} available: {detail}")]
    NoData { what: &'static str, detail: String },
}

/// A specialized Result type for sprs operations.
pub type Result<T> = std::result::Result<T, Error>;
