// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core domain types for the sp fronting tracker.
//!
//! This crate holds everything shared between the `sp` CLI and the `spd`
//! daemon that does not touch the network: the member/fronter data model,
//! the push-protocol message types, the layered cache store, and profile
//! path resolution.

pub mod cache;
pub mod config;
pub mod models;
pub mod paths;
pub mod protocol;

mod error;

pub use cache::{CacheStore, CacheTtls, Category, EntryInfo, Freshness, Lookup};
pub use config::ProfileConfig;
pub use error::{Error, Result};
pub use models::{CustomFront, EntityKind, FrontEntry, FronterSet, Member, Switch};
pub use protocol::{PushEvent, PushOp, PushTarget};
