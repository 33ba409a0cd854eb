// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only connection status.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::lifecycle::LinkState;
use crate::phone::user_part;
use crate::session::SessionView;

/// Status as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub timestamp: DateTime<Utc>,
    pub reconnect_attempts: u32,
    pub state: LinkState,
    /// Set once the retry budget is spent; cleared by the next successful open.
    pub retries_exhausted: bool,
    /// Account number of the authenticated session, without domain or device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Answers status queries from the published snapshot.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    view: SessionView,
}

impl StatusReporter {
    pub fn new(view: SessionView) -> Self {
        StatusReporter { view }
    }

    /// Current status. Never blocks on the supervisor.
    pub fn status(&self) -> ConnectionStatus {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, timestamp: DateTime<Utc>) -> ConnectionStatus {
        let snapshot = self.view.borrow();
        ConnectionStatus {
            connected: snapshot.is_connected(),
            timestamp,
            reconnect_attempts: snapshot.attempts(),
            state: snapshot.state(),
            retries_exhausted: snapshot.is_exhausted(),
            user: snapshot.user().map(|jid| user_part(jid).to_owned()),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
