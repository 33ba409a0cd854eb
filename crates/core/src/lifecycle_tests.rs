// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use super::*;

fn lifecycle() -> Lifecycle {
    Lifecycle::new(ReconnectConfig {
        max_attempts: 5,
        base_delay: Duration::from_millis(5000),
    })
}

fn close(code: u16) -> LifecycleSignal {
    LifecycleSignal::Close {
        reason: DisconnectReason::from_status_code(Some(code)),
    }
}

fn open() -> LifecycleSignal {
    LifecycleSignal::Open {
        user: Some("5511999990000".into()),
    }
}

#[test]
fn starts_disconnected() {
    let lc = lifecycle();
    assert_eq!(lc.state(), LinkState::Disconnected);
    assert_eq!(lc.reconnect().attempts(), 0);
    assert!(!lc.is_exhausted());
    assert!(lc.user().is_none());
}

#[test]
fn happy_path_transitions() {
    let mut lc = lifecycle();

    lc.on_session_started();
    assert_eq!(lc.state(), LinkState::Connecting);

    assert_eq!(lc.on_signal(&LifecycleSignal::Connecting), Action::Wait);
    assert_eq!(lc.state(), LinkState::Connecting);

    assert_eq!(lc.on_signal(&open()), Action::Wait);
    assert_eq!(lc.state(), LinkState::Connected);
    assert_eq!(lc.user(), Some("5511999990000"));
}

#[test]
fn recoverable_close_schedules_reconnect() {
    let mut lc = lifecycle();
    lc.on_session_started();
    lc.on_signal(&open());

    let action = lc.on_signal(&close(408));
    assert_eq!(action, Action::Reconnect(Duration::from_millis(5000)));
    assert_eq!(lc.state(), LinkState::Disconnected);
    assert_eq!(lc.reconnect().attempts(), 1);
    assert!(lc.reconnect().in_progress());
    assert!(lc.user().is_none());
}

#[test]
fn five_failed_reconnects_exhaust_budget() {
    let mut lc = lifecycle();
    lc.on_session_started();

    let mut delays = Vec::new();
    for _ in 0..5 {
        match lc.on_signal(&close(428)) {
            Action::Reconnect(delay) => delays.push(delay.as_millis()),
            other => panic!("expected reconnect, got {:?}", other),
        }
        lc.on_session_started();
    }
    assert_eq!(delays, vec![5000, 10000, 20000, 40000, 80000]);

    // Sixth close: no further attempt.
    assert_eq!(lc.on_signal(&close(428)), Action::Halt);
    assert_eq!(lc.state(), LinkState::Disconnected);
    assert_eq!(lc.reconnect().attempts(), 5);
    assert!(!lc.reconnect().in_progress());
    assert!(lc.is_exhausted());
}

#[test]
fn logout_is_terminal_regardless_of_attempts() {
    let mut lc = lifecycle();
    lc.on_session_started();
    lc.on_signal(&close(408));
    lc.on_session_started();
    lc.on_signal(&close(408));
    assert_eq!(lc.reconnect().attempts(), 2);

    lc.on_session_started();
    assert_eq!(lc.on_signal(&close(401)), Action::Halt);
    assert_eq!(lc.state(), LinkState::LoggedOut);
    assert!(!lc.is_exhausted());

    // Nothing moves a logged-out lifecycle.
    assert_eq!(lc.on_signal(&open()), Action::Halt);
    lc.on_session_started();
    assert_eq!(lc.state(), LinkState::LoggedOut);
}

#[test]
fn attempts_do_not_leak_between_cycles() {
    let mut lc = lifecycle();
    lc.on_session_started();
    lc.on_signal(&open());

    // First cycle: two failed attempts, then success.
    lc.on_signal(&close(408));
    lc.on_session_started();
    lc.on_signal(&close(408));
    assert_eq!(lc.reconnect().attempts(), 2);
    lc.on_session_started();
    lc.on_signal(&open());
    assert_eq!(lc.reconnect().attempts(), 0);

    // Second cycle starts from the base delay again.
    let action = lc.on_signal(&close(408));
    assert_eq!(action, Action::Reconnect(Duration::from_millis(5000)));
    assert_eq!(lc.reconnect().attempts(), 1);
    lc.on_session_started();
    lc.on_signal(&open());
    assert_eq!(lc.reconnect().attempts(), 0);
    assert!(!lc.reconnect().in_progress());
}

#[test]
fn connect_failure_counts_as_failed_attempt() {
    let mut lc = lifecycle();
    lc.on_session_started();
    assert_eq!(
        lc.on_signal(&close(408)),
        Action::Reconnect(Duration::from_millis(5000))
    );

    let action = lc.on_connect_failed();
    assert_eq!(action, Action::Reconnect(Duration::from_millis(10000)));
    assert_eq!(lc.reconnect().attempts(), 2);
    assert_eq!(lc.state(), LinkState::Disconnected);
}

#[test]
fn open_clears_exhaustion_flag() {
    let mut lc = Lifecycle::new(ReconnectConfig {
        max_attempts: 1,
        base_delay: Duration::from_millis(10),
    });
    lc.on_session_started();
    lc.on_signal(&close(408));
    lc.on_session_started();
    assert_eq!(lc.on_signal(&close(408)), Action::Halt);
    assert!(lc.is_exhausted());

    lc.on_signal(&open());
    assert!(!lc.is_exhausted());
    assert_eq!(lc.state(), LinkState::Connected);
}

#[test]
fn link_state_display_and_session_ownership() {
    assert_eq!(LinkState::LoggedOut.to_string(), "logged_out");
    assert!(LinkState::Connecting.holds_session());
    assert!(LinkState::Connected.holds_session());
    assert!(!LinkState::Disconnected.holds_session());
    assert!(!LinkState::LoggedOut.holds_session());
}
