// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound text messages.

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::phone::{redact, to_jid};
use crate::session::SessionView;

/// Longest accepted message, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Reject empty or oversized message bodies.
///
/// Whitespace-only text is a valid message. Length is counted in UTF-16
/// code units, the unit the messaging clients limit on.
pub fn validate_message(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::EmptyMessage);
    }
    let len = text.encode_utf16().count();
    if len > MAX_MESSAGE_LEN {
        return Err(Error::MessageTooLong {
            len,
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(())
}

/// Sends text messages through the current session.
#[derive(Debug, Clone)]
pub struct MessageSender {
    view: SessionView,
}

impl MessageSender {
    pub fn new(view: SessionView) -> Self {
        MessageSender { view }
    }

    /// Send `text` to `number`, a normalized phone number or a recipient id.
    ///
    /// Only allowed while connected.
    pub async fn send_text(&self, number: &str, text: &str) -> Result<()> {
        validate_message(text)?;

        let handle = {
            let snapshot = self.view.borrow();
            match snapshot.handle() {
                Some(handle) if snapshot.is_connected() => handle,
                _ => return Err(Error::SessionNotReady),
            }
        };

        let jid = to_jid(number);
        let to = redact(&jid);
        match handle.send_message(&jid, text).await {
            Ok(()) => {
                info!(event = "message_sent", %to, len = text.chars().count(), "message sent");
                Ok(())
            }
            Err(e) => {
                error!(event = "message_send_failed", %to, error = %e, "message send failed");
                Err(Error::SendFailed(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "outbound_tests.rs"]
mod tests;
