// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! link-core: Session supervision for the messaging link service
//!
//! This crate provides the connection state machine, reconnect policy,
//! pairing and send operations shared by the bridge transport and the
//! linkd daemon. The network engine itself sits behind [`TransportEngine`].

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod outbound;
pub mod pairing;
pub mod phone;
pub mod policy;
pub mod session;
pub mod status;
pub mod supervisor;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use engine::{
    Connection, DisconnectReason, LifecycleSignal, SessionHandle, TransportEngine,
    TransportError, TransportResult,
};
pub use error::{Error, Result};
pub use lifecycle::{Action, Lifecycle, LinkState};
pub use outbound::{validate_message, MessageSender, MAX_MESSAGE_LEN};
pub use pairing::{PairingCode, PairingCoordinator, PAIRING_CODE_TTL_SECS};
pub use policy::{ReconnectConfig, ReconnectionPolicy, ReconnectionState};
pub use session::{SessionSnapshot, SessionView};
pub use status::{ConnectionStatus, StatusReporter};
pub use supervisor::{ConnectionSupervisor, SupervisorConfig};
