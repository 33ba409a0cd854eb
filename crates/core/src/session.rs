// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared view of the supervised session.
//!
//! The supervisor is the only writer. It publishes a [`SessionSnapshot`]
//! through a `watch` channel after every transition; readers borrow the
//! latest snapshot without waiting on the supervisor task. The current
//! session handle lives in the same snapshot, so replacing it and updating
//! the state is one atomic publish.

use std::sync::Arc;

use tokio::sync::watch;

use crate::engine::SessionHandle;
use crate::lifecycle::{Lifecycle, LinkState};

/// Point-in-time copy of the supervisor's state.
#[derive(Clone)]
pub struct SessionSnapshot {
    state: LinkState,
    attempts: u32,
    max_attempts: u32,
    exhausted: bool,
    user: Option<String>,
    handle: Option<Arc<dyn SessionHandle>>,
}

impl SessionSnapshot {
    pub(crate) fn initial(max_attempts: u32) -> Self {
        SessionSnapshot {
            state: LinkState::Disconnected,
            attempts: 0,
            max_attempts,
            exhausted: false,
            user: None,
            handle: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn has_session(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn handle(&self) -> Option<Arc<dyn SessionHandle>> {
        self.handle.clone()
    }
}

impl std::fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("state", &self.state)
            .field("attempts", &self.attempts)
            .field("max_attempts", &self.max_attempts)
            .field("exhausted", &self.exhausted)
            .field("user", &self.user)
            .field("has_session", &self.handle.is_some())
            .finish()
    }
}

/// Receiving side handed to readers.
pub type SessionView = watch::Receiver<SessionSnapshot>;

/// Publish the lifecycle's state.
///
/// `handle` installs a new session. The stored handle is dropped whenever the
/// state no longer holds a session.
pub(crate) fn publish(
    slot: &watch::Sender<SessionSnapshot>,
    lifecycle: &Lifecycle,
    handle: Option<Arc<dyn SessionHandle>>,
) {
    slot.send_modify(|snapshot| {
        snapshot.state = lifecycle.state();
        snapshot.attempts = lifecycle.reconnect().attempts();
        snapshot.max_attempts = lifecycle.reconnect().max_attempts();
        snapshot.exhausted = lifecycle.is_exhausted();
        snapshot.user = lifecycle.user().map(str::to_owned);
        if handle.is_some() {
            snapshot.handle = handle;
        }
        if !snapshot.state.holds_session() {
            snapshot.handle = None;
        }
    });
}
