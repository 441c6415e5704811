// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Profile configuration, one TOML file per profile.
//!
//! Both binaries read the same file: the CLI for tokens, tier timeouts,
//! and auto-start behaviour; the daemon for the push endpoint and backoff
//! tunables. Every field has a default so a minimal config is just the
//! token line.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::CacheTtls;
use crate::error::{Error, Result};

fn default_api_url() -> String {
    "https://api.apparyllis.com/v1".to_string()
}

fn default_socket_url() -> String {
    "wss://api.apparyllis.com/v1/socket".to_string()
}

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_daemon_timeout_ms() -> u64 {
    500
}

fn default_reconnect_initial_secs() -> u64 {
    1
}

fn default_reconnect_max_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

/// One profile's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// API token for the remote service.
    pub token: String,

    /// REST base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// WebSocket push endpoint.
    #[serde(default = "default_socket_url")]
    pub socket_url: String,

    /// Per-request REST timeout.
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    /// How long the CLI waits on the daemon socket before falling through.
    #[serde(default = "default_daemon_timeout_ms")]
    pub daemon_timeout_ms: u64,

    /// First reconnect delay; doubles up to `reconnect_max_secs`.
    #[serde(default = "default_reconnect_initial_secs")]
    pub reconnect_initial_secs: u64,

    #[serde(default = "default_reconnect_max_secs")]
    pub reconnect_max_secs: u64,

    /// Spawn the daemon in the background when a query finds it absent.
    #[serde(default = "default_true")]
    pub auto_start_daemon: bool,

    /// Cache TTLs, seconds per category.
    #[serde(default)]
    pub cache: CacheTtlConfig,
}

/// TTL overrides; missing fields keep the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheTtlConfig {
    pub fronters_secs: Option<u64>,
    pub members_secs: Option<u64>,
    pub custom_fronts_secs: Option<u64>,
    pub switches_secs: Option<u64>,
}

impl CacheTtlConfig {
    pub fn ttls(&self) -> CacheTtls {
        let defaults = CacheTtls::default();
        CacheTtls {
            fronters_secs: self.fronters_secs.unwrap_or(defaults.fronters_secs),
            members_secs: self.members_secs.unwrap_or(defaults.members_secs),
            custom_fronts_secs: self
                .custom_fronts_secs
                .unwrap_or(defaults.custom_fronts_secs),
            switches_secs: self.switches_secs.unwrap_or(defaults.switches_secs),
        }
    }
}

impl ProfileConfig {
    /// Load a profile config from its TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("no config at {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        let config: ProfileConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        if config.token.trim().is_empty() {
            return Err(Error::Config(format!(
                "{}: token must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
