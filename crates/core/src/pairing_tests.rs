// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::engine::LifecycleSignal;
use crate::policy::ReconnectConfig;
use crate::supervisor::{ConnectionSupervisor, SupervisorConfig};
use crate::testing::ScriptedEngine;
use chrono::TimeZone;
use std::time::Duration;

fn supervisor(engine: &ScriptedEngine) -> ConnectionSupervisor<ScriptedEngine> {
    ConnectionSupervisor::new(
        engine.clone(),
        SupervisorConfig {
            auth_path: "/tmp/auth_info".into(),
            reconnect: ReconnectConfig {
                max_attempts: 5,
                base_delay: Duration::from_millis(5000),
            },
        },
    )
}

#[tokio::test(start_paused = true)]
async fn requires_a_session() {
    let engine = ScriptedEngine::new();
    let supervisor = supervisor(&engine);

    let err = supervisor
        .pairing()
        .issue_code("5511999990000")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SessionNotReady));
    assert!(engine.pairing_requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn issues_code_while_negotiating() {
    // Pairing happens before the session is open.
    let engine = ScriptedEngine::new().with_session([LifecycleSignal::Connecting]);
    let supervisor = supervisor(&engine);
    supervisor.initialize().await.unwrap();

    let code = supervisor
        .pairing()
        .issue_code("5511999990000")
        .await
        .unwrap();
    assert_eq!(code.code, ScriptedEngine::PAIRING_CODE);
    assert_eq!(
        (code.expires_at - code.issued_at).num_seconds(),
        PAIRING_CODE_TTL_SECS
    );
    assert_eq!(engine.pairing_requests(), vec!["5511999990000".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn engine_failure_is_wrapped() {
    let engine = ScriptedEngine::new()
        .with_session(Vec::<LifecycleSignal>::new())
        .with_pairing_failure("rate-overlimit");
    let supervisor = supervisor(&engine);
    supervisor.initialize().await.unwrap();

    let err = supervisor
        .pairing()
        .issue_code("5511999990000")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PairingRequestFailed(_)));
    assert!(err.to_string().contains("rate-overlimit"));
}

#[test]
fn expiry_counts_down_to_zero() {
    let issued_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let code = PairingCode::issued("ABCD-1234".into(), issued_at);

    assert_eq!(code.expires_in_secs(issued_at), 60);
    assert_eq!(
        code.expires_in_secs(issued_at + chrono::Duration::seconds(45)),
        15
    );
    assert_eq!(
        code.expires_in_secs(issued_at + chrono::Duration::seconds(90)),
        0
    );
}

#[test]
fn serializes_camel_case() {
    let issued_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let code = PairingCode::issued("ABCD-1234".into(), issued_at);
    let json = serde_json::to_value(&code).unwrap();

    assert_eq!(json["code"], "ABCD-1234");
    assert_eq!(json["issuedAt"], "2026-01-01T12:00:00Z");
    assert_eq!(json["expiresAt"], "2026-01-01T12:01:00Z");
}
