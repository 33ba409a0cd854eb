// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::engine::{DisconnectReason, LifecycleSignal};
use crate::lifecycle::Lifecycle;
use crate::policy::ReconnectConfig;
use crate::session::{publish, SessionSnapshot};
use chrono::TimeZone;
use tokio::sync::watch;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

fn reporter() -> (watch::Sender<SessionSnapshot>, StatusReporter) {
    let (tx, rx) = watch::channel(SessionSnapshot::initial(5));
    (tx, StatusReporter::new(rx))
}

#[test]
fn reflects_published_state() {
    let (tx, reporter) = reporter();
    let mut lifecycle = Lifecycle::new(ReconnectConfig::default());
    lifecycle.on_session_started();
    lifecycle.on_signal(&LifecycleSignal::Open {
        user: Some("5511999990000:3@s.whatsapp.net".into()),
    });
    publish(&tx, &lifecycle, None);

    let status = reporter.status_at(fixed_time());
    assert_eq!(
        status,
        ConnectionStatus {
            connected: true,
            timestamp: fixed_time(),
            reconnect_attempts: 0,
            state: LinkState::Connected,
            retries_exhausted: false,
            user: Some("5511999990000".into()),
        }
    );

    lifecycle.on_signal(&LifecycleSignal::Close {
        reason: DisconnectReason::ConnectionLost,
    });
    publish(&tx, &lifecycle, None);

    let status = reporter.status();
    assert!(!status.connected);
    assert_eq!(status.reconnect_attempts, 1);
    assert_eq!(status.state, LinkState::Disconnected);
    assert!(status.user.is_none());
}

#[test]
fn serializes_camel_case_without_missing_user() {
    let (_tx, reporter) = reporter();
    let json = serde_json::to_value(reporter.status_at(fixed_time())).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "connected": false,
            "timestamp": "2026-03-01T09:30:00Z",
            "reconnectAttempts": 0,
            "state": "disconnected",
            "retriesExhausted": false,
        })
    );
}
