// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sp", version)]
#[command(about = "Track who is fronting from the command line")]
#[command(
    long_about = "Track who is fronting from the command line.\n\n\
    Queries go to a per-profile background daemon that mirrors the service\n\
    over a push connection; without it, answers come from the local cache\n\
    or a direct API call."
)]
pub struct Cli {
    /// Profile to use (selects config file, cache, and daemon instance)
    #[arg(long, global = true, default_value = "default")]
    pub profile: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show who is currently fronting
    #[command(after_help = "Examples:\n  \
        sp fronting               Show the current fronters\n  \
        sp fronting --prompt      One-line output for a shell prompt\n  \
        sp fronting --no-daemon   Skip the daemon and cache, ask the API")]
    Fronting {
        /// Bypass the daemon and cache; query the service directly
        #[arg(long)]
        no_daemon: bool,

        /// Compact one-line output, accepts stale data
        #[arg(long)]
        prompt: bool,
    },

    /// List system members
    Members {
        /// Bypass the daemon and cache; query the service directly
        #[arg(long)]
        no_daemon: bool,
    },

    /// List custom fronts
    CustomFronts {
        /// Bypass the daemon and cache; query the service directly
        #[arg(long)]
        no_daemon: bool,
    },

    /// Register a switch to the named members or custom fronts
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        sp switch Alice                  Alice fronts alone\n  \
        sp switch Alice Garnet           Co-fronting\n  \
        sp switch Alice --note \"tired\"   Switch with a status note"
    )]
    Switch {
        /// Exact names of the members or custom fronts now fronting
        #[arg(required = true)]
        names: Vec<String>,

        /// Status note attached to the switch
        #[arg(long)]
        note: Option<String>,
    },

    /// Show daemon, connection, and cache status for the profile
    Status,

    /// Manage the background daemon
    Daemon {
        #[command(subcommand)]
        command: DaemonCommand,
    },

    /// Inspect or clear the response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon for this profile (no-op if already running)
    Start {
        /// Run in the foreground instead of detaching
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon (no-op if not running)
    Stop,
    /// Restart the daemon
    Restart,
    /// Show whether the daemon is running and its connection state
    Status,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Show per-category cache age, TTL, and size
    Info,
    /// Delete all cached data for this profile
    Clear,
}
