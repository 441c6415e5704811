// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors produced by sp-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache write failed: {0}")]
    CacheWrite(String),

    #[error("unknown cache category: '{0}'")]
    UnknownCategory(String),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for sp-core operations.
pub type Result<T> = std::result::Result<T, Error>;
