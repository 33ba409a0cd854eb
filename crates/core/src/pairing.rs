// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pairing code issuance for linking a phone to the session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::phone::redact;
use crate::session::SessionView;

/// How long an issued pairing code stays valid, in seconds.
pub const PAIRING_CODE_TTL_SECS: i64 = 60;

/// A pairing code and its validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingCode {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PairingCode {
    fn issued(code: String, issued_at: DateTime<Utc>) -> Self {
        PairingCode {
            code,
            issued_at,
            expires_at: issued_at + chrono::Duration::seconds(PAIRING_CODE_TTL_SECS),
        }
    }

    /// Seconds of validity left at `now`, zero once expired.
    pub fn expires_in_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// Requests pairing codes from the current session.
#[derive(Debug, Clone)]
pub struct PairingCoordinator {
    view: SessionView,
}

impl PairingCoordinator {
    pub fn new(view: SessionView) -> Self {
        PairingCoordinator { view }
    }

    /// Ask the current session for a pairing code for `digits`.
    ///
    /// `digits` is the already normalized phone number. Fails with
    /// [`Error::SessionNotReady`] when no session exists.
    pub async fn issue_code(&self, digits: &str) -> Result<PairingCode> {
        // Clone out of the borrow; the guard must not live across the await.
        let handle = self.view.borrow().handle().ok_or(Error::SessionNotReady)?;
        let phone = redact(digits);

        info!(event = "pairing_code_requested", %phone, "requesting pairing code");
        match handle.request_pairing_code(digits).await {
            Ok(code) => {
                info!(event = "pairing_code_issued", %phone, "pairing code issued");
                Ok(PairingCode::issued(code, Utc::now()))
            }
            Err(e) => {
                error!(event = "pairing_code_failed", %phone, error = %e, "pairing code request failed");
                Err(Error::PairingRequestFailed(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod tests;
