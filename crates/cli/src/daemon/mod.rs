// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-facing plumbing for the CLI: the synchronous IPC client and
//! lifecycle management (spawn, detect, stop, status).

pub mod client;
pub mod lifecycle;
