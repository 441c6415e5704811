// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: spawn, detect, stop, status.
//!
//! The daemon (spd) runs as a background process, one per profile, and
//! communicates via Unix socket. PID, socket, lock, and log files live
//! in the profile's state directory (~/.local/state/sp/<profile>/).
//! Stale files left by a crashed daemon are detected and reaped here.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use sp_ipc::{DaemonRequest, DaemonResponse, DaemonStatus};

use crate::daemon::client::DaemonClient;
use crate::error::{Error, Result};

/// Socket filename within the profile state directory.
const SOCKET_NAME: &str = "daemon.sock";
/// PID filename within the profile state directory.
const PID_NAME: &str = "daemon.pid";
/// Recorded reason for the last daemon exit, if it stopped on error.
const LAST_ERROR_NAME: &str = "last_error";

/// Timeout for liveness pings.
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Information about a running daemon.
#[derive(Debug, Clone)]
pub struct DaemonInfo {
    /// Process ID of the daemon.
    pub pid: u32,
}

/// Outcome of a start request.
#[derive(Debug)]
pub enum StartOutcome {
    Started(DaemonInfo),
    AlreadyRunning(DaemonInfo),
}

/// Outcome of a stop request.
#[derive(Debug, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

pub fn socket_path(state_dir: &Path) -> PathBuf {
    state_dir.join(SOCKET_NAME)
}

pub fn pid_path(state_dir: &Path) -> PathBuf {
    state_dir.join(PID_NAME)
}

/// Detect whether a daemon is running for the given state directory.
///
/// Returns `Some(DaemonInfo)` if a daemon is responding to pings, `None`
/// otherwise. Stale socket/PID files from a crashed daemon are removed.
pub fn detect_daemon(state_dir: &Path) -> Option<DaemonInfo> {
    let socket = socket_path(state_dir);
    let pid_file = pid_path(state_dir);

    if !socket.exists() {
        // No socket; a leftover PID file is stale unless its process is
        // still starting up, which the ping poll in start() covers.
        if let Some(pid) = read_pid_file(&pid_file) {
            if !process_alive(pid) {
                let _ = fs::remove_file(&pid_file);
            }
        }
        return None;
    }

    match ping(&socket) {
        Ok(()) => match read_pid_file(&pid_file) {
            Some(pid) if pid > 0 => Some(DaemonInfo { pid }),
            // PID file missing or unreadable while the socket answers;
            // treat as not-yet-ready rather than guessing a pid.
            _ => None,
        },
        Err(_) => {
            cleanup_stale_files(state_dir);
            None
        }
    }
}

fn ping(socket: &Path) -> Result<()> {
    let mut client = DaemonClient::connect(socket, PING_TIMEOUT)?;
    match client.request(&DaemonRequest::Ping)? {
        DaemonResponse::Pong => Ok(()),
        other => Err(Error::Daemon(format!("unexpected response: {:?}", other))),
    }
}

/// Start the daemon for a profile. No-op reporting the existing instance
/// when one is already running.
pub fn start(profile: &str, state_dir: &Path) -> Result<StartOutcome> {
    if let Some(info) = detect_daemon(state_dir) {
        return Ok(StartOutcome::AlreadyRunning(info));
    }

    fs::create_dir_all(state_dir)?;
    let spd_path = find_daemon_binary();

    let mut child = Command::new(&spd_path)
        .arg("--profile")
        .arg(profile)
        .arg("--state-dir")
        .arg(state_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::DaemonStart(format!("spawning {} failed: {}", spd_path.display(), e))
        })?;

    // The daemon prints READY once its socket is bound.
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        for line in reader.lines() {
            match line {
                Ok(line) if line == "READY" => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    // Ping-poll until it answers, watching for an early exit.
    for _ in 0..150 {
        if let Ok(Some(status)) = child.try_wait() {
            let stderr_output = child
                .stderr
                .take()
                .map(|mut stderr| {
                    use std::io::Read;
                    let mut output = String::new();
                    let _ = stderr.read_to_string(&mut output);
                    output
                })
                .unwrap_or_default();
            return Err(Error::DaemonStart(format!(
                "daemon exited with status {}\n{}",
                status,
                stderr_output.trim()
            )));
        }

        if let Some(info) = detect_daemon(state_dir) {
            return Ok(StartOutcome::Started(info));
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    Err(Error::DaemonStart(
        "daemon did not become reachable after start".to_string(),
    ))
}

/// Spawn the daemon without waiting for it to come up. Used by the
/// locator's auto-start path, which must not block the current command.
pub fn spawn_background(profile: &str, state_dir: &Path) {
    if fs::create_dir_all(state_dir).is_err() {
        return;
    }
    let spd_path = find_daemon_binary();
    let result = Command::new(&spd_path)
        .arg("--profile")
        .arg(profile)
        .arg("--state-dir")
        .arg(state_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(e) = result {
        tracing::debug!("background daemon spawn failed: {}", e);
    }
}

/// Run the daemon in the foreground, inheriting stdio, until it exits.
pub fn run_foreground(profile: &str, state_dir: &Path) -> Result<()> {
    fs::create_dir_all(state_dir)?;
    let spd_path = find_daemon_binary();
    let status = Command::new(&spd_path)
        .arg("--profile")
        .arg(profile)
        .arg("--state-dir")
        .arg(state_dir)
        .status()
        .map_err(|e| {
            Error::DaemonStart(format!("spawning {} failed: {}", spd_path.display(), e))
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::Daemon(format!("daemon exited with status {}", status)))
    }
}

/// Stop the daemon: graceful shutdown request, SIGKILL fallback, then
/// file cleanup. Not-running is a no-op, not an error.
pub fn stop(state_dir: &Path) -> Result<StopOutcome> {
    let socket = socket_path(state_dir);
    let pid = read_pid_file(&pid_path(state_dir));

    if !socket.exists() && pid.is_none() {
        return Ok(StopOutcome::NotRunning);
    }

    let graceful = request_shutdown(&socket).is_ok();
    if graceful {
        if let Some(pid) = pid {
            wait_for_process_exit(pid, Duration::from_secs(2));
        }
        cleanup_stale_files(state_dir);
        return Ok(StopOutcome::Stopped);
    }

    // Graceful shutdown failed. If the process is still alive, kill it.
    let was_running = match pid {
        Some(pid) if process_alive(pid) => {
            let _ = Command::new("kill").arg("-9").arg(pid.to_string()).output();
            std::thread::sleep(Duration::from_millis(100));
            true
        }
        _ => false,
    };
    cleanup_stale_files(state_dir);

    if was_running {
        Ok(StopOutcome::Stopped)
    } else {
        Ok(StopOutcome::NotRunning)
    }
}

/// Stop then start.
pub fn restart(profile: &str, state_dir: &Path) -> Result<StartOutcome> {
    stop(state_dir)?;
    start(profile, state_dir)
}

/// Query the running daemon's status, `None` when not running.
pub fn daemon_status(state_dir: &Path) -> Result<Option<DaemonStatus>> {
    let socket = socket_path(state_dir);
    if !socket.exists() {
        return Ok(None);
    }

    let mut client = match DaemonClient::connect(&socket, Duration::from_secs(5)) {
        Ok(client) => client,
        Err(_) => {
            cleanup_stale_files(state_dir);
            return Ok(None);
        }
    };
    match client.request(&DaemonRequest::Status)? {
        DaemonResponse::Status(status) => Ok(Some(status)),
        other => Err(Error::Daemon(format!("unexpected response: {:?}", other))),
    }
}

/// The reason the daemon last stopped on error, if it recorded one.
pub fn last_error(state_dir: &Path) -> Option<String> {
    let text = fs::read_to_string(state_dir.join(LAST_ERROR_NAME)).ok()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn request_shutdown(socket: &Path) -> Result<()> {
    let mut client = DaemonClient::connect(socket, PING_TIMEOUT)?;
    match client.request(&DaemonRequest::Shutdown)? {
        DaemonResponse::ShuttingDown => Ok(()),
        other => Err(Error::Daemon(format!("unexpected response: {:?}", other))),
    }
}

/// Find the spd binary: env override, next to the current executable,
/// then PATH.
fn find_daemon_binary() -> PathBuf {
    if let Ok(path) = std::env::var("SP_DAEMON_BINARY") {
        return PathBuf::from(path);
    }

    if let Ok(exe) = std::env::current_exe() {
        let spd = exe.with_file_name("spd");
        if spd.exists() {
            return spd;
        }
    }

    PathBuf::from("spd")
}

fn cleanup_stale_files(state_dir: &Path) {
    let _ = fs::remove_file(socket_path(state_dir));
    let _ = fs::remove_file(pid_path(state_dir));
}

fn read_pid_file(pid_file: &Path) -> Option<u32> {
    fs::read_to_string(pid_file)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Check whether a process exists (kill -0).
fn process_alive(pid: u32) -> bool {
    match Command::new("kill").arg("-0").arg(pid.to_string()).output() {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

fn wait_for_process_exit(pid: u32, timeout: Duration) {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if !process_alive(pid) {
            return;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
