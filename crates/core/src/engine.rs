// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport engine abstraction.
//!
//! The engine is the external collaborator that actually speaks the
//! messaging network's protocol. This crate only sees it through two traits:
//! - [`TransportEngine`] opens a session and hands back its lifecycle signals
//! - [`SessionHandle`] forwards pairing and send requests on that session
//!
//! Both traits return boxed futures so they stay object safe and can be
//! swapped for scripted fakes in tests.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

/// Error type for transport engine operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The session's connection is gone.
    #[error("connection closed")]
    ConnectionClosed,

    /// The engine rejected a request.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// A message could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type for transport engine operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Why the engine closed a session.
///
/// Codes follow the engine's numeric disconnect status codes. Only
/// [`DisconnectReason::LoggedOut`] is terminal; everything else is treated as
/// a recoverable disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    LoggedOut,
    ConnectionLost,
    MultideviceMismatch,
    ConnectionClosed,
    ConnectionReplaced,
    BadSession,
    Unavailable,
    RestartRequired,
    /// A code the engine reported that has no known meaning, or no code at all.
    Unknown(Option<u16>),
}

impl DisconnectReason {
    /// Classifies an engine status code.
    pub fn from_status_code(code: Option<u16>) -> Self {
        match code {
            Some(401) => DisconnectReason::LoggedOut,
            Some(408) => DisconnectReason::ConnectionLost,
            Some(411) => DisconnectReason::MultideviceMismatch,
            Some(428) => DisconnectReason::ConnectionClosed,
            Some(440) => DisconnectReason::ConnectionReplaced,
            Some(500) => DisconnectReason::BadSession,
            Some(503) => DisconnectReason::Unavailable,
            Some(515) => DisconnectReason::RestartRequired,
            other => DisconnectReason::Unknown(other),
        }
    }

    /// The engine status code for this reason, if there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DisconnectReason::LoggedOut => Some(401),
            DisconnectReason::ConnectionLost => Some(408),
            DisconnectReason::MultideviceMismatch => Some(411),
            DisconnectReason::ConnectionClosed => Some(428),
            DisconnectReason::ConnectionReplaced => Some(440),
            DisconnectReason::BadSession => Some(500),
            DisconnectReason::Unavailable => Some(503),
            DisconnectReason::RestartRequired => Some(515),
            DisconnectReason::Unknown(code) => *code,
        }
    }

    /// Returns true if the remote end explicitly ended the session.
    pub fn is_logout(&self) -> bool {
        matches!(self, DisconnectReason::LoggedOut)
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisconnectReason::LoggedOut => "logged_out",
            DisconnectReason::ConnectionLost => "connection_lost",
            DisconnectReason::MultideviceMismatch => "multidevice_mismatch",
            DisconnectReason::ConnectionClosed => "connection_closed",
            DisconnectReason::ConnectionReplaced => "connection_replaced",
            DisconnectReason::BadSession => "bad_session",
            DisconnectReason::Unavailable => "unavailable",
            DisconnectReason::RestartRequired => "restart_required",
            DisconnectReason::Unknown(_) => "unknown",
        };
        f.write_str(name)
    }
}

/// Lifecycle signal emitted by the engine for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleSignal {
    /// The session is negotiating with the network.
    Connecting,
    /// The session is authenticated and live.
    Open {
        /// Authenticated account id, when the engine reports one.
        user: Option<String>,
    },
    /// The session ended.
    Close { reason: DisconnectReason },
}

/// A freshly started session: its handle plus the stream of its signals.
pub struct Connection {
    pub handle: Arc<dyn SessionHandle>,
    pub signals: mpsc::Receiver<LifecycleSignal>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("handle", &"<session>")
            .finish_non_exhaustive()
    }
}

/// Operations available on one live or pending session.
pub trait SessionHandle: Send + Sync {
    /// Ask the engine for a pairing code for the given phone digits.
    fn request_pairing_code<'a>(&'a self, digits: &'a str) -> BoxFuture<'a, TransportResult<String>>;

    /// Send a text message to a fully qualified recipient id.
    fn send_message<'a>(&'a self, jid: &'a str, text: &'a str) -> BoxFuture<'a, TransportResult<()>>;
}

/// Factory for sessions.
///
/// Each call to [`TransportEngine::connect`] runs the full connect sequence,
/// including loading persisted credentials from `auth_path`, and returns a
/// brand-new session. Handles are never reused across calls.
pub trait TransportEngine: Send + Sync + 'static {
    fn connect<'a>(&'a self, auth_path: &'a Path) -> BoxFuture<'a, TransportResult<Connection>>;
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
