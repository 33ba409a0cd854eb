// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for link-core operations.

use thiserror::Error;

use crate::engine::TransportError;

/// Errors returned to callers of the session API.
///
/// Transient disconnects never show up here; they are handled inside the
/// supervisor and only visible as status changes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport failed to start: {0}")]
    TransportInit(#[source] TransportError),

    #[error("session not ready\n  hint: wait for the connection to be re-established")]
    SessionNotReady,

    #[error("pairing code request failed: {0}")]
    PairingRequestFailed(#[source] TransportError),

    #[error("message send failed: {0}")]
    SendFailed(#[source] TransportError),

    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("message is empty")]
    EmptyMessage,

    #[error("message too long: {len} characters (max {max})")]
    MessageTooLong { len: usize, max: usize },
}

/// A specialized Result type for link-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
