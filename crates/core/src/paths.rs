// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Profile-scoped filesystem locations.
//!
//! Every profile gets its own config file, cache directory, and daemon
//! state directory so concurrent profiles never collide:
//!
//! - config: `~/.config/sp/<profile>.toml`
//! - cache:  `~/.cache/sp/<profile>/`
//! - state:  `~/.local/state/sp/<profile>/` (socket, pid, lock, log)

use std::path::PathBuf;

const APP_DIR: &str = "sp";

/// Default profile name when none is given.
pub const DEFAULT_PROFILE: &str = "default";

/// Path of the profile's TOML config file.
pub fn config_file(profile: &str) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(format!("{}.toml", profile))
}

/// Directory for the profile's persisted cache tier.
pub fn cache_dir(profile: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(profile)
}

/// Directory for the profile's daemon runtime files.
pub fn state_dir(profile: &str) -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join(APP_DIR).join(profile);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/state")
        .join(APP_DIR)
        .join(profile)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
