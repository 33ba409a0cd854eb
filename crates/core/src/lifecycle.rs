// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle state machine.
//!
//! Maps lifecycle signals onto a [`LinkState`] and decides what the
//! supervisor loop does next. No I/O happens here; the supervisor executes
//! the returned [`Action`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::engine::{DisconnectReason, LifecycleSignal};
use crate::policy::{ReconnectConfig, ReconnectionPolicy, ReconnectionState};

/// State of the supervised session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// No session, or the last one closed.
    Disconnected,
    /// A session exists and is negotiating.
    Connecting,
    /// The session is open.
    Connected,
    /// The remote end logged the account out. Terminal.
    LoggedOut,
}

impl LinkState {
    /// Returns true if the current session handle is still usable.
    pub fn holds_session(&self) -> bool {
        matches!(self, LinkState::Connecting | LinkState::Connected)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
            LinkState::LoggedOut => "logged_out",
        };
        f.write_str(name)
    }
}

/// Next step for the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep consuming signals from the current session.
    Wait,
    /// Sleep for the delay, then start a brand-new session.
    Reconnect(Duration),
    /// Stop supervising; no further automatic action.
    Halt,
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LinkState,
    reconnect: ReconnectionState,
    exhausted: bool,
    user: Option<String>,
}

impl Lifecycle {
    pub fn new(config: ReconnectConfig) -> Self {
        Lifecycle {
            state: LinkState::Disconnected,
            reconnect: ReconnectionState::new(config),
            exhausted: false,
            user: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn reconnect(&self) -> &ReconnectionState {
        &self.reconnect
    }

    /// Returns true once the retry budget ran out without a successful open.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// A new session was handed over by the engine and is negotiating.
    pub fn on_session_started(&mut self) {
        if self.state != LinkState::LoggedOut {
            self.state = LinkState::Connecting;
        }
    }

    /// Apply one lifecycle signal from the current session.
    pub fn on_signal(&mut self, signal: &LifecycleSignal) -> Action {
        if self.state == LinkState::LoggedOut {
            return Action::Halt;
        }

        match signal {
            LifecycleSignal::Connecting => {
                self.state = LinkState::Connecting;
                Action::Wait
            }
            LifecycleSignal::Open { user } => {
                self.state = LinkState::Connected;
                self.exhausted = false;
                self.user = user.clone();
                ReconnectionPolicy::record_success(&mut self.reconnect);
                Action::Wait
            }
            LifecycleSignal::Close { reason } => self.on_close(*reason),
        }
    }

    /// The engine could not even start the session for a retry.
    pub fn on_connect_failed(&mut self) -> Action {
        self.on_close(DisconnectReason::Unknown(None))
    }

    fn on_close(&mut self, reason: DisconnectReason) -> Action {
        self.user = None;

        if reason.is_logout() {
            self.state = LinkState::LoggedOut;
            return Action::Halt;
        }

        self.state = LinkState::Disconnected;
        if self.reconnect.in_progress() {
            // The session started by the pending attempt never opened.
            ReconnectionPolicy::record_failure(&mut self.reconnect);
        }
        self.decide()
    }

    fn decide(&mut self) -> Action {
        if ReconnectionPolicy::should_retry(&self.reconnect) {
            let delay = ReconnectionPolicy::next_delay(&self.reconnect);
            ReconnectionPolicy::record_attempt_start(&mut self.reconnect);
            Action::Reconnect(delay)
        } else if self.reconnect.is_exhausted() {
            self.exhausted = true;
            Action::Halt
        } else {
            Action::Wait
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
