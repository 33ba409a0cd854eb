// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between linkd and the engine sidecar.
//!
//! The protocol is simple:
//! - linkd opens one socket per session and sends `connect` first
//! - the bridge streams `connection` updates for that session
//! - requests carry an id that the bridge echoes in its reply

use serde::{Deserialize, Serialize};

use link_core::{DisconnectReason, LifecycleSignal};

/// Messages sent from linkd to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start a session with the credentials stored at `auth_path`.
    Connect { auth_path: String },

    /// Request a pairing code for a phone number (digits only).
    PairingCode { id: u64, phone: String },

    /// Send a text message to a recipient id.
    SendText { id: u64, jid: String, text: String },
}

/// Session state reported in `connection` updates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Open,
    Close,
}

/// Messages sent from the bridge to linkd.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeMessage {
    /// Lifecycle update for the session on this socket.
    Connection {
        state: ConnectionState,
        /// Engine status code, present on `close`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        /// Authenticated account id, present on `open`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<String>,
    },

    /// Reply to a `pairing_code` request.
    PairingCode { id: u64, code: String },

    /// Reply to a `send_text` request.
    Sent { id: u64 },

    /// Request failure, or a session-level error when `id` is absent.
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        message: String,
    },
}

impl ClientMessage {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl BridgeMessage {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The lifecycle signal carried by a `connection` update.
    pub fn lifecycle_signal(&self) -> Option<LifecycleSignal> {
        match self {
            BridgeMessage::Connection {
                state,
                status_code,
                user,
            } => Some(match state {
                ConnectionState::Connecting => LifecycleSignal::Connecting,
                ConnectionState::Open => LifecycleSignal::Open { user: user.clone() },
                ConnectionState::Close => LifecycleSignal::Close {
                    reason: DisconnectReason::from_status_code(*status_code),
                },
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
