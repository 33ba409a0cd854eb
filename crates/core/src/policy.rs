// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnection budget and exponential backoff.
//!
//! Pure bookkeeping with no I/O: the supervisor owns a [`ReconnectionState`]
//! and asks [`ReconnectionPolicy`] what to do with it.

use std::time::Duration;

/// Configuration for reconnection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Maximum reconnection attempts before giving up (at least 1).
    pub max_attempts: u32,
    /// Delay before the first attempt; doubles for each later one.
    pub base_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        ReconnectConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(5000),
        }
    }
}

/// Attempt counter for the current run of disconnects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectionState {
    attempts: u32,
    max_attempts: u32,
    base_delay: Duration,
    /// True while a delay-then-reconnect sequence is executing.
    in_progress: bool,
}

impl ReconnectionState {
    pub fn new(config: ReconnectConfig) -> Self {
        ReconnectionState {
            attempts: 0,
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay,
            in_progress: false,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Returns true once every allowed attempt has been used.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

/// Decisions over a [`ReconnectionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconnectionPolicy;

impl ReconnectionPolicy {
    /// Budget left and no other retry running.
    pub fn should_retry(state: &ReconnectionState) -> bool {
        state.attempts < state.max_attempts && !state.in_progress
    }

    /// `base_delay * 2^attempts`, using the count before the next attempt starts.
    pub fn next_delay(state: &ReconnectionState) -> Duration {
        let multiplier = 1_u32.checked_shl(state.attempts).unwrap_or(u32::MAX);
        state.base_delay.saturating_mul(multiplier)
    }

    pub fn record_attempt_start(state: &mut ReconnectionState) {
        state.attempts = state.attempts.saturating_add(1).min(state.max_attempts);
        state.in_progress = true;
    }

    pub fn record_success(state: &mut ReconnectionState) {
        state.attempts = 0;
        state.in_progress = false;
    }

    /// The pending attempt is over; its count stays spent.
    pub fn record_failure(state: &mut ReconnectionState) {
        state.in_progress = false;
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
