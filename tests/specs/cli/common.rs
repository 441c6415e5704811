// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use chrono::{Duration, Utc};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A config whose remote endpoints refuse connections immediately, so
/// direct-tier attempts fail fast instead of timing out.
pub const OFFLINE_CONFIG: &str = r#"
token = "spt_test_token"
api_url = "http://127.0.0.1:1"
socket_url = "ws://127.0.0.1:1"
auto_start_daemon = false
"#;

/// An isolated home for one test: config, cache, and state dirs all
/// live under a temp dir so tests never touch the real profile.
pub struct TestHome {
    temp: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        TestHome {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.temp.path()
    }

    fn config_home(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    fn cache_home(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    fn state_home(&self) -> PathBuf {
        self.temp.path().join("state")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_home().join("sp").join("default.toml")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_home().join("sp").join("default")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_home().join("sp").join("default")
    }

    pub fn write_config(&self, body: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    /// Write a cache entry the way the store persists it: the payload
    /// wrapped with its fetch time and TTL.
    pub fn write_cache_entry(
        &self,
        category: &str,
        payload: serde_json::Value,
        age_secs: i64,
        ttl_secs: u64,
    ) {
        let dir = self.cache_dir();
        fs::create_dir_all(&dir).unwrap();
        let entry = serde_json::json!({
            "data": payload,
            "fetched_at": Utc::now() - Duration::seconds(age_secs),
            "ttl_secs": ttl_secs,
        });
        fs::write(
            dir.join(format!("{}.json", category)),
            serde_json::to_string(&entry).unwrap(),
        )
        .unwrap();
    }

    /// An `sp` command pointed at this home.
    pub fn sp(&self) -> Command {
        let mut cmd = sp();
        cmd.env("HOME", self.temp.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_CACHE_HOME", self.cache_home())
            .env("XDG_STATE_HOME", self.state_home())
            .env_remove("SP_DAEMON_BINARY");
        cmd
    }
}

pub fn sp() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("sp").unwrap()
}

/// Path to the spd binary built alongside the test suite.
pub fn spd_binary() -> PathBuf {
    #[allow(deprecated)]
    assert_cmd::cargo::cargo_bin("spd")
}
