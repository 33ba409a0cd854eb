// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! link-bridge: WebSocket transport engine for link-core
//!
//! Talks to the messaging engine sidecar over a JSON WebSocket protocol and
//! exposes each connection as a link-core session.

pub mod engine;
pub mod protocol;

pub use engine::BridgeEngine;
pub use protocol::{BridgeMessage, ClientMessage, ConnectionState};
