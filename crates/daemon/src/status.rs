// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared connection status for the daemon.
//!
//! Held in atomics so IPC handlers can report status without taking any
//! lock the main loop or connection task might hold.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Mutex;

/// Connection state values for the atomic state field.
pub const STATE_STARTING: u8 = 0;
pub const STATE_CONNECTING: u8 = 1;
pub const STATE_LIVE: u8 = 2;
pub const STATE_DEGRADED: u8 = 3;
pub const STATE_STOPPED: u8 = 4;

/// Connection status visible to the main loop, the connection task, and
/// every IPC handler task.
pub struct SharedStatus {
    state: AtomicU8,
    /// Connection attempt count since the last drop.
    attempt: AtomicU32,
    /// Why the daemon stopped, when it did.
    stop_reason: Mutex<Option<String>>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_STARTING),
            attempt: AtomicU32::new(0),
            stop_reason: Mutex::new(None),
        }
    }

    pub fn get(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub fn set(&self, state: u8) {
        self.state.store(state, Ordering::Release);
    }

    pub fn attempt(&self) -> u32 {
        self.attempt.load(Ordering::Acquire)
    }

    pub fn set_attempt(&self, attempt: u32) {
        self.attempt.store(attempt, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        self.get() == STATE_LIVE
    }

    /// Record why the daemon is stopping and flip to stopped.
    pub fn record_stop(&self, reason: &str) {
        if let Ok(mut slot) = self.stop_reason.lock() {
            *slot = Some(reason.to_string());
        }
        self.set(STATE_STOPPED);
    }

    pub fn stop_reason(&self) -> Option<String> {
        self.stop_reason.lock().ok().and_then(|slot| slot.clone())
    }

    /// Human-readable state for status responses.
    pub fn status_string(&self) -> String {
        match self.get() {
            STATE_STARTING => "starting".to_string(),
            STATE_CONNECTING => {
                let attempt = self.attempt();
                if attempt > 1 {
                    format!("connecting (attempt {})", attempt)
                } else {
                    "connecting".to_string()
                }
            }
            STATE_LIVE => "live".to_string(),
            STATE_DEGRADED => "degraded".to_string(),
            STATE_STOPPED => "stopped".to_string(),
            _ => "unknown".to_string(),
        }
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
