// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sp_core::paths;

use crate::cli::DaemonCommand;
use crate::daemon::lifecycle::{self, StartOutcome, StopOutcome};
use crate::error::Result;

pub fn run(profile: &str, command: DaemonCommand) -> Result<()> {
    let state_dir = paths::state_dir(profile);

    match command {
        DaemonCommand::Start { foreground: true } => lifecycle::run_foreground(profile, &state_dir),
        DaemonCommand::Start { foreground: false } => {
            match lifecycle::start(profile, &state_dir)? {
                StartOutcome::Started(info) => println!("Daemon started (pid {})", info.pid),
                StartOutcome::AlreadyRunning(info) => {
                    println!("Daemon already running (pid {})", info.pid)
                }
            }
            Ok(())
        }
        DaemonCommand::Stop => {
            match lifecycle::stop(&state_dir)? {
                StopOutcome::Stopped => println!("Daemon stopped"),
                StopOutcome::NotRunning => println!("Daemon not running"),
            }
            Ok(())
        }
        DaemonCommand::Restart => {
            match lifecycle::restart(profile, &state_dir)? {
                StartOutcome::Started(info) => println!("Daemon restarted (pid {})", info.pid),
                // restart stops first, so a fresh instance always starts.
                StartOutcome::AlreadyRunning(info) => {
                    println!("Daemon already running (pid {})", info.pid)
                }
            }
            Ok(())
        }
        DaemonCommand::Status => {
            match lifecycle::daemon_status(&state_dir)? {
                Some(status) => {
                    println!("Daemon running (pid {})", status.pid);
                    println!("  connection: {}", status.connection);
                }
                None => {
                    println!("Daemon not running");
                    if let Some(reason) = lifecycle::last_error(&state_dir) {
                        println!("  last error: {}", reason);
                    }
                }
            }
            Ok(())
        }
    }
}
