// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted transport engine for tests.
//!
//! Each `connect` call consumes the next [`Script`]: either a failure or a
//! session whose signal stream yields the scripted signals. Signal streams
//! stay open after the script runs out, like a real session that is just
//! quiet, and [`ScriptedEngine::emit`] pushes more signals into the latest
//! one. Requests made on sessions are recorded for assertions.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::engine::{
    Connection, LifecycleSignal, SessionHandle, TransportEngine, TransportError, TransportResult,
};

const SIGNAL_BUFFER: usize = 32;

/// Outcome of one `connect` call.
#[derive(Debug, Clone)]
pub enum Script {
    /// The connect call fails with this message.
    Fail(String),
    /// The connect call succeeds and the session emits these signals.
    Session(Vec<LifecycleSignal>),
}

#[derive(Default)]
struct Inner {
    scripts: VecDeque<Script>,
    connects: Vec<Instant>,
    senders: Vec<mpsc::Sender<LifecycleSignal>>,
    pairing_requests: Vec<String>,
    sent: Vec<(String, String)>,
    pairing_failure: Option<String>,
    send_failure: Option<String>,
}

/// Transport engine driven by a script instead of a network.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedEngine {
    /// Pairing code returned by every scripted session.
    pub const PAIRING_CODE: &'static str = "ABCD-1234";

    pub fn new() -> Self {
        Self::default()
    }

    /// The next connect succeeds with a session emitting `signals`.
    pub fn with_session(self, signals: impl IntoIterator<Item = LifecycleSignal>) -> Self {
        self.inner
            .lock()
            .scripts
            .push_back(Script::Session(signals.into_iter().collect()));
        self
    }

    /// The next connect fails.
    pub fn with_connect_failure(self, message: impl Into<String>) -> Self {
        self.inner
            .lock()
            .scripts
            .push_back(Script::Fail(message.into()));
        self
    }

    /// Pairing requests fail with this message.
    pub fn with_pairing_failure(self, message: impl Into<String>) -> Self {
        self.inner.lock().pairing_failure = Some(message.into());
        self
    }

    /// Send requests fail with this message.
    pub fn with_send_failure(self, message: impl Into<String>) -> Self {
        self.inner.lock().send_failure = Some(message.into());
        self
    }

    /// Push a signal into the most recently started session.
    ///
    /// Returns false if no session was started yet or its stream is gone.
    pub fn emit(&self, signal: LifecycleSignal) -> bool {
        let inner = self.inner.lock();
        match inner.senders.last() {
            Some(tx) => tx.try_send(signal).is_ok(),
            None => false,
        }
    }

    /// When each connect call happened.
    pub fn connect_times(&self) -> Vec<Instant> {
        self.inner.lock().connects.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.inner.lock().connects.len()
    }

    /// Digits of every pairing request, in order.
    pub fn pairing_requests(&self) -> Vec<String> {
        self.inner.lock().pairing_requests.clone()
    }

    /// `(jid, text)` of every send request, in order.
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.inner.lock().sent.clone()
    }
}

impl TransportEngine for ScriptedEngine {
    fn connect<'a>(&'a self, _auth_path: &'a Path) -> BoxFuture<'a, TransportResult<Connection>> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.connects.push(Instant::now());

            let signals = match inner.scripts.pop_front() {
                Some(Script::Fail(message)) => {
                    return Err(TransportError::ConnectionFailed(message));
                }
                Some(Script::Session(signals)) => signals,
                None => Vec::new(),
            };

            let (tx, rx) = mpsc::channel(SIGNAL_BUFFER.max(signals.len()));
            for signal in signals {
                let _ = tx.try_send(signal);
            }
            inner.senders.push(tx);

            let handle: Arc<dyn SessionHandle> = Arc::new(ScriptedSession {
                inner: Arc::clone(&self.inner),
            });
            Ok(Connection {
                handle,
                signals: rx,
            })
        })
    }
}

struct ScriptedSession {
    inner: Arc<Mutex<Inner>>,
}

impl SessionHandle for ScriptedSession {
    fn request_pairing_code<'a>(&'a self, digits: &'a str) -> BoxFuture<'a, TransportResult<String>> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.pairing_requests.push(digits.to_string());
            match &inner.pairing_failure {
                Some(message) => Err(TransportError::RequestFailed(message.clone())),
                None => Ok(ScriptedEngine::PAIRING_CODE.to_string()),
            }
        })
    }

    fn send_message<'a>(&'a self, jid: &'a str, text: &'a str) -> BoxFuture<'a, TransportResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.lock();
            inner.sent.push((jid.to_string(), text.to_string()));
            match &inner.send_failure {
                Some(message) => Err(TransportError::RequestFailed(message.clone())),
                None => Ok(()),
            }
        })
    }
}
