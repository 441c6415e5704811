// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod cache;
mod common;
mod config;
mod fronting;
mod help;
mod lifecycle;
mod status;
