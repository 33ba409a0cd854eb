// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection supervision.
//!
//! The [`ConnectionSupervisor`] owns the single session. After
//! [`ConnectionSupervisor::initialize`] a background task consumes the
//! session's lifecycle signals one at a time, feeds them to the
//! [`Lifecycle`] state machine and executes the resulting [`Action`]:
//!
//! ```text
//!  engine signals ──► supervise() ──► Lifecycle::on_signal ──► Action
//!                        ▲                                      │
//!                        │   Reconnect(delay): sleep, connect   │
//!                        └──────────── new signal stream ◄──────┘
//! ```
//!
//! Reconnection is an explicit loop bounded by the retry budget; every
//! retry discards the old handle and signal stream. State is published
//! through a `watch` channel (see [`crate::session`]), so status, pairing
//! and send requests never wait on the supervisor task.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::{Connection, DisconnectReason, LifecycleSignal, TransportEngine};
use crate::error::{Error, Result};
use crate::lifecycle::{Action, Lifecycle, LinkState};
use crate::outbound::MessageSender;
use crate::pairing::PairingCoordinator;
use crate::phone::{redact, user_part};
use crate::policy::{ReconnectConfig, ReconnectionPolicy, ReconnectionState};
use crate::session::{publish, SessionSnapshot, SessionView};
use crate::status::StatusReporter;

/// Configuration for the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Credential directory handed to the engine on every connect.
    pub auth_path: PathBuf,
    /// Retry budget and base delay.
    pub reconnect: ReconnectConfig,
}

/// Owner of the single supervised session.
pub struct ConnectionSupervisor<E: TransportEngine> {
    engine: Arc<E>,
    config: SupervisorConfig,
    slot: Arc<watch::Sender<SessionSnapshot>>,
    /// Supervision task, present once initialized.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<E: TransportEngine> ConnectionSupervisor<E> {
    pub fn new(engine: E, config: SupervisorConfig) -> Self {
        let max_attempts = ReconnectionState::new(config.reconnect).max_attempts();
        let (slot, _) = watch::channel(SessionSnapshot::initial(max_attempts));

        ConnectionSupervisor {
            engine: Arc::new(engine),
            config,
            slot: Arc::new(slot),
            task: Mutex::new(None),
        }
    }

    /// Start the first session and the supervision task.
    ///
    /// Idempotent once it has succeeded. Concurrent calls are serialized.
    pub async fn initialize(&self) -> Result<()> {
        let mut task = self.task.lock().await;
        if task.is_some() {
            debug!(event = "initialize_skipped", "supervisor already running");
            return Ok(());
        }

        info!(
            event = "initialization_start",
            auth_path = %self.config.auth_path.display(),
            "starting session"
        );

        let connection = match self.engine.connect(&self.config.auth_path).await {
            Ok(connection) => connection,
            Err(e) => {
                error!(event = "initialization_error", error = %e, "failed to start session");
                return Err(Error::TransportInit(e));
            }
        };

        let mut lifecycle = Lifecycle::new(self.config.reconnect);
        lifecycle.on_session_started();
        let Connection { handle, signals } = connection;
        publish(&self.slot, &lifecycle, Some(handle));

        *task = Some(tokio::spawn(supervise(
            Arc::clone(&self.engine),
            self.config.auth_path.clone(),
            lifecycle,
            signals,
            Arc::clone(&self.slot),
        )));

        info!(event = "initialization_complete", "session started");
        Ok(())
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> SessionView {
        self.slot.subscribe()
    }

    pub fn status_reporter(&self) -> StatusReporter {
        StatusReporter::new(self.subscribe())
    }

    pub fn pairing(&self) -> PairingCoordinator {
        PairingCoordinator::new(self.subscribe())
    }

    pub fn message_sender(&self) -> MessageSender {
        MessageSender::new(self.subscribe())
    }
}

impl<E: TransportEngine> Drop for ConnectionSupervisor<E> {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

/// Supervision loop. Runs until logout or until the retry budget is spent.
async fn supervise<E: TransportEngine>(
    engine: Arc<E>,
    auth_path: PathBuf,
    mut lifecycle: Lifecycle,
    mut signals: mpsc::Receiver<LifecycleSignal>,
    slot: Arc<watch::Sender<SessionSnapshot>>,
) {
    let mut next = Action::Wait;

    loop {
        next = match next {
            Action::Wait => {
                let signal = match signals.recv().await {
                    Some(signal) => signal,
                    None if lifecycle.state().holds_session() => {
                        warn!(event = "signal_stream_ended", "session stream ended without close");
                        LifecycleSignal::Close {
                            reason: DisconnectReason::ConnectionLost,
                        }
                    }
                    None => {
                        debug!(event = "signal_stream_ended", state = %lifecycle.state(), "supervisor idle");
                        return;
                    }
                };

                let action = lifecycle.on_signal(&signal);
                log_transition(&signal, &lifecycle, action);
                publish(&slot, &lifecycle, None);
                action
            }

            Action::Reconnect(delay) => {
                wait_backoff(delay, &mut signals, lifecycle.reconnect()).await;

                match engine.connect(&auth_path).await {
                    Ok(Connection {
                        handle,
                        signals: fresh,
                    }) => {
                        // The old stream and handle are dropped here.
                        signals = fresh;
                        lifecycle.on_session_started();
                        publish(&slot, &lifecycle, Some(handle));
                        info!(
                            event = "reconnection_started",
                            attempt = lifecycle.reconnect().attempts(),
                            "new session started"
                        );
                        Action::Wait
                    }
                    Err(e) => {
                        let action = lifecycle.on_connect_failed();
                        error!(
                            event = "reconnection_failed",
                            attempt = lifecycle.reconnect().attempts(),
                            error = %e,
                            "failed to start new session"
                        );
                        log_decision(&lifecycle, action);
                        publish(&slot, &lifecycle, None);
                        action
                    }
                }
            }

            Action::Halt => return,
        };
    }
}

/// Sleep through a backoff delay while draining the discarded stream.
///
/// Late signals from the old session cannot start a second retry chain: the
/// pending attempt holds `in_progress`.
async fn wait_backoff(
    delay: Duration,
    signals: &mut mpsc::Receiver<LifecycleSignal>,
    reconnect: &ReconnectionState,
) {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    let mut open = true;

    loop {
        tokio::select! {
            _ = &mut sleep => return,
            signal = signals.recv(), if open => match signal {
                Some(signal) => debug!(
                    event = "stale_signal_ignored",
                    ?signal,
                    should_retry = ReconnectionPolicy::should_retry(reconnect),
                    "signal from discarded session"
                ),
                None => open = false,
            },
        }
    }
}

fn log_transition(signal: &LifecycleSignal, lifecycle: &Lifecycle, action: Action) {
    match signal {
        LifecycleSignal::Connecting => {
            info!(event = "connecting", state = %lifecycle.state(), "connecting");
        }
        LifecycleSignal::Open { .. } => {
            let user = lifecycle
                .user()
                .map_or_else(|| "-".to_string(), |jid| redact(user_part(jid)));
            info!(
                event = "connection_opened",
                state = %lifecycle.state(),
                %user,
                "connected"
            );
        }
        LifecycleSignal::Close { reason } => {
            let delay_ms = match action {
                Action::Reconnect(delay) => Some(delay.as_millis() as u64),
                _ => None,
            };
            warn!(
                event = "connection_closed",
                state = %lifecycle.state(),
                reason = %reason,
                status_code = ?reason.status_code(),
                should_reconnect = !reason.is_logout(),
                ?delay_ms,
                "connection closed"
            );
            log_decision(lifecycle, action);
        }
    }
}

fn log_decision(lifecycle: &Lifecycle, action: Action) {
    let reconnect = lifecycle.reconnect();
    match action {
        Action::Reconnect(delay) => info!(
            event = "reconnection_attempt",
            attempt = reconnect.attempts(),
            max_attempts = reconnect.max_attempts(),
            delay_ms = delay.as_millis() as u64,
            "reconnecting after delay"
        ),
        Action::Halt if lifecycle.state() == LinkState::LoggedOut => {
            info!(event = "logged_out", "session logged out; pairing required")
        }
        Action::Halt if lifecycle.is_exhausted() => error!(
            event = "reconnect_budget_exhausted",
            attempts = reconnect.attempts(),
            max_attempts = reconnect.max_attempts(),
            "reconnect budget exhausted; restart required"
        ),
        Action::Halt | Action::Wait => {}
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
