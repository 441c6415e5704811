// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sprs - fronting-status tracking library for the `sp` CLI.
//!
//! This crate provides the client side of the sp tool: the clap command
//! surface, the [`Locator`] that answers queries through the
//! daemon/cache/direct fallback ladder, and lifecycle management for the
//! per-profile `spd` daemon.
//!
//! # Main Components
//!
//! - [`Locator`] - three-tier data lookup (daemon IPC, cache, direct REST)
//! - [`daemon::lifecycle`] - spawn, detect, stop, and status for spd
//! - [`Cli`] / [`Command`] - the command-line surface
//! - [`Error`] - error types for all operations

mod cli;
mod commands;
pub mod daemon;
pub mod error;
pub mod locator;

pub use cli::{CacheCommand, Cli, Command, DaemonCommand};
pub use error::{Error, Result};
pub use locator::{Freshness, Locator, QueryOptions, Source, Sourced};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let profile = cli.profile;
    match cli.command {
        Command::Fronting { no_daemon, prompt } => {
            commands::fronting::run(&profile, no_daemon, prompt)
        }
        Command::Members { no_daemon } => commands::members::run(&profile, no_daemon),
        Command::CustomFronts { no_daemon } => commands::custom_fronts::run(&profile, no_daemon),
        Command::Switch { names, note } => commands::switch::run(&profile, names, note),
        Command::Status => commands::status::run(&profile),
        Command::Daemon { command } => commands::daemon::run(&profile, command),
        Command::Cache { command } => commands::cache::run(&profile, command),
    }
}
