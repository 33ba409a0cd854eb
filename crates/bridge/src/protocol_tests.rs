// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn client_messages_are_type_tagged() {
    let json = ClientMessage::Connect {
        auth_path: "/app/data/auth_info".into(),
    }
    .to_json()
    .unwrap();
    assert_eq!(json, r#"{"type":"connect","auth_path":"/app/data/auth_info"}"#);

    let json = ClientMessage::SendText {
        id: 7,
        jid: "5511999990000@s.whatsapp.net".into(),
        text: "hi".into(),
    }
    .to_json()
    .unwrap();
    assert_eq!(
        json,
        r#"{"type":"send_text","id":7,"jid":"5511999990000@s.whatsapp.net","text":"hi"}"#
    );
}

#[parameterized(
    connecting = {
        r#"{"type":"connection","state":"connecting"}"#,
        LifecycleSignal::Connecting
    },
    open_with_user = {
        r#"{"type":"connection","state":"open","user":"5511999990000:4@s.whatsapp.net"}"#,
        LifecycleSignal::Open { user: Some("5511999990000:4@s.whatsapp.net".into()) }
    },
    open_without_user = {
        r#"{"type":"connection","state":"open"}"#,
        LifecycleSignal::Open { user: None }
    },
    close_logged_out = {
        r#"{"type":"connection","state":"close","status_code":401}"#,
        LifecycleSignal::Close { reason: DisconnectReason::LoggedOut }
    },
    close_restart = {
        r#"{"type":"connection","state":"close","status_code":515}"#,
        LifecycleSignal::Close { reason: DisconnectReason::RestartRequired }
    },
    close_without_code = {
        r#"{"type":"connection","state":"close"}"#,
        LifecycleSignal::Close { reason: DisconnectReason::Unknown(None) }
    },
)]
fn connection_updates_map_to_signals(json: &str, expected: LifecycleSignal) {
    let msg = BridgeMessage::from_json(json).unwrap();
    assert_eq!(msg.lifecycle_signal(), Some(expected));
}

#[parameterized(
    pairing_code = { r#"{"type":"pairing_code","id":1,"code":"ABCD-1234"}"# },
    sent = { r#"{"type":"sent","id":2}"# },
    error = { r#"{"type":"error","id":3,"message":"boom"}"# },
    error_without_id = { r#"{"type":"error","message":"boom"}"# },
)]
fn replies_carry_no_signal(json: &str) {
    let msg = BridgeMessage::from_json(json).unwrap();
    assert_eq!(msg.lifecycle_signal(), None);
}

#[test]
fn unknown_type_is_rejected() {
    assert!(BridgeMessage::from_json(r#"{"type":"qr","data":"..."}"#).is_err());
}
