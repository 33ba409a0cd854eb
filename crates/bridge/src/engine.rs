// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport engine backed by the bridge sidecar.
//!
//! Every [`BridgeEngine::connect`] opens a fresh WebSocket and sends
//! `connect`. A reader task turns `connection` updates into lifecycle
//! signals and routes replies to waiting requests by id. When the socket
//! ends, waiting requests fail and the session reports `connection_lost`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use link_core::{
    Connection, DisconnectReason, LifecycleSignal, SessionHandle, TransportEngine, TransportError,
    TransportResult,
};

use crate::protocol::{BridgeMessage, ClientMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Buffered lifecycle signals per session.
const SIGNAL_BUFFER: usize = 32;

/// How long a request waits for its reply.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects sessions through the bridge at `url`.
#[derive(Debug, Clone)]
pub struct BridgeEngine {
    url: String,
}

impl BridgeEngine {
    pub fn new(url: impl Into<String>) -> Self {
        BridgeEngine { url: url.into() }
    }
}

impl TransportEngine for BridgeEngine {
    fn connect<'a>(&'a self, auth_path: &'a Path) -> BoxFuture<'a, TransportResult<Connection>> {
        Box::pin(async move {
            let (ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            let (mut sink, stream) = ws.split();

            let hello = ClientMessage::Connect {
                auth_path: auth_path.display().to_string(),
            }
            .to_json()
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
            sink.send(Message::Text(hello.into()))
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);
            let pending = Pending::default();
            let reader = tokio::spawn(read_loop(stream, tx, pending.clone()));
            debug!(event = "bridge_session_opened", url = %self.url, "bridge session opened");

            let handle: Arc<dyn SessionHandle> = Arc::new(BridgeSession {
                sink: tokio::sync::Mutex::new(sink),
                pending,
                next_id: AtomicU64::new(1),
                reader,
            });
            Ok(Connection {
                handle,
                signals: rx,
            })
        })
    }
}

/// Reply routed back to a waiting request.
#[derive(Debug)]
enum Reply {
    Code(String),
    Sent,
    Failed(String),
}

/// Requests waiting for a reply, keyed by id.
#[derive(Clone, Default)]
struct Pending(Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>);

impl Pending {
    fn insert(&self, id: u64, tx: oneshot::Sender<Reply>) {
        self.0.lock().insert(id, tx);
    }

    fn remove(&self, id: u64) {
        self.0.lock().remove(&id);
    }

    /// Deliver a reply. False if nobody waits for `id`.
    fn resolve(&self, id: u64, reply: Reply) -> bool {
        match self.0.lock().remove(&id) {
            Some(tx) => tx.send(reply).is_ok(),
            None => false,
        }
    }

    /// Drop every waiter; their requests fail with `ConnectionClosed`.
    fn fail_all(&self) {
        self.0.lock().clear();
    }
}

struct BridgeSession {
    sink: tokio::sync::Mutex<SplitSink<WsStream, Message>>,
    pending: Pending,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl BridgeSession {
    async fn request(&self, build: impl FnOnce(u64) -> ClientMessage) -> TransportResult<Reply> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let json = build(id)
            .to_json()
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        let sent = {
            let mut sink = self.sink.lock().await;
            sink.send(Message::Text(json.into())).await
        };
        if let Err(e) = sent {
            self.pending.remove(id);
            return Err(TransportError::RequestFailed(e.to_string()));
        }

        match tokio::time::timeout(REQUEST_TIMEOUT, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(TransportError::ConnectionClosed),
            Err(_) => {
                self.pending.remove(id);
                Err(TransportError::RequestFailed("timed out waiting for reply".into()))
            }
        }
    }
}

impl SessionHandle for BridgeSession {
    fn request_pairing_code<'a>(&'a self, digits: &'a str) -> BoxFuture<'a, TransportResult<String>> {
        Box::pin(async move {
            let reply = self
                .request(|id| ClientMessage::PairingCode {
                    id,
                    phone: digits.to_string(),
                })
                .await?;
            match reply {
                Reply::Code(code) => Ok(code),
                Reply::Failed(message) => Err(TransportError::RequestFailed(message)),
                Reply::Sent => Err(TransportError::Protocol(
                    "unexpected reply to pairing_code".into(),
                )),
            }
        })
    }

    fn send_message<'a>(&'a self, jid: &'a str, text: &'a str) -> BoxFuture<'a, TransportResult<()>> {
        Box::pin(async move {
            let reply = self
                .request(|id| ClientMessage::SendText {
                    id,
                    jid: jid.to_string(),
                    text: text.to_string(),
                })
                .await?;
            match reply {
                Reply::Sent => Ok(()),
                Reply::Failed(message) => Err(TransportError::RequestFailed(message)),
                Reply::Code(_) => Err(TransportError::Protocol(
                    "unexpected reply to send_text".into(),
                )),
            }
        })
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Read bridge messages until the socket ends or the supervisor stops listening.
async fn read_loop(
    mut stream: SplitStream<WsStream>,
    signals: mpsc::Sender<LifecycleSignal>,
    pending: Pending,
) {
    // Whether the bridge already reported the session closed.
    let mut closed = false;

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(event = "bridge_read_error", error = %e, "bridge socket error");
                break;
            }
        };

        let msg = match BridgeMessage::from_json(&text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(event = "bridge_message_invalid", error = %e, "ignoring bridge message");
                continue;
            }
        };

        if let Some(signal) = msg.lifecycle_signal() {
            closed = matches!(signal, LifecycleSignal::Close { .. });
            if signals.send(signal).await.is_err() {
                // The supervisor moved on to another session.
                pending.fail_all();
                return;
            }
            continue;
        }

        let (id, reply) = match msg {
            BridgeMessage::PairingCode { id, code } => (id, Reply::Code(code)),
            BridgeMessage::Sent { id } => (id, Reply::Sent),
            BridgeMessage::Error {
                id: Some(id),
                message,
            } => (id, Reply::Failed(message)),
            BridgeMessage::Error { id: None, message } => {
                warn!(event = "bridge_error", %message, "bridge reported an error");
                continue;
            }
            BridgeMessage::Connection { .. } => continue,
        };
        if !pending.resolve(id, reply) {
            debug!(event = "bridge_reply_unmatched", id, "no request waiting for reply");
        }
    }

    pending.fail_all();
    if !closed {
        let _ = signals
            .send(LifecycleSignal::Close {
                reason: DisconnectReason::ConnectionLost,
            })
            .await;
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
