// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! spd - fronting status daemon.
//!
//! Holds a push connection to the service, mirrors fronting state in
//! memory, and serves it to `sp` CLI processes over a Unix socket at
//! `~/.local/state/sp/<profile>/daemon.sock`.
//!
//! Usage:
//!   spd [--profile <name>] [--state-dir <path>]

use std::fs;
use std::path::{Path, PathBuf};

mod connection;
mod error;
mod runner;
mod state;
mod status;

use error::Error;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let profile = parse_flag(&args, "--profile")
        .unwrap_or_else(|| sp_core::paths::DEFAULT_PROFILE.to_string());
    let state_dir = parse_flag(&args, "--state-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| sp_core::paths::state_dir(&profile));

    if let Err(e) = fs::create_dir_all(&state_dir) {
        eprintln!("spd: cannot create state dir {}: {}", state_dir.display(), e);
        std::process::exit(1);
    }

    let log_path = state_dir.join("daemon.log");
    setup_logging(&log_path);

    let config_path = sp_core::paths::config_file(&profile);
    let config = match sp_core::ProfileConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load profile config: {}", e);
            eprintln!("spd: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(runner::run(&profile, &state_dir, &config)) {
        Ok(()) => {}
        Err(Error::AlreadyRunning) => {
            tracing::error!("another daemon is already running for this profile");
            eprintln!("spd: another daemon is already running for this profile");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("daemon stopped with error: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn setup_logging(log_path: &Path) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Log to the profile's daemon.log, falling back to stderr.
    if let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
