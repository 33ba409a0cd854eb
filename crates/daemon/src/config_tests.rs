// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn defaults_when_nothing_is_set() {
    let config = Config::resolve(RawConfig::default()).unwrap();

    assert_eq!(config.mode, Mode::Production);
    assert_eq!(config.port, 3001);
    assert_eq!(config.auth_path, PathBuf::from("/app/data/auth_info"));
    assert_eq!(config.bridge_url, "ws://127.0.0.1:3002");
    assert_eq!(config.reconnect.max_attempts, 5);
    assert_eq!(config.reconnect.base_delay, Duration::from_millis(5000));
    assert_eq!(
        config.allowed_origins,
        vec![
            "https://revolta.top".to_string(),
            "https://revolta-ftvy.vercel.app".to_string()
        ]
    );
    assert_eq!(config.log_level, "info");
    assert_eq!(config.pair_rate_limit, 3);
    assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn values_override_defaults() {
    let config = Config::resolve(RawConfig {
        port: Some("8080".into()),
        auth_path: Some("/srv/auth".into()),
        max_reconnect_attempts: Some("8".into()),
        reconnect_delay: Some("250".into()),
        allowed_origins: Some("https://a.example, ,https://b.example".into()),
        rate_limit_max: Some("10".into()),
        app_version: Some("2.1.0".into()),
        ..RawConfig::default()
    })
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.auth_path, PathBuf::from("/srv/auth"));
    assert_eq!(config.reconnect.max_attempts, 8);
    assert_eq!(config.reconnect.base_delay, Duration::from_millis(250));
    assert_eq!(
        config.allowed_origins,
        vec!["https://a.example".to_string(), "https://b.example".to_string()]
    );
    assert_eq!(config.pair_rate_limit, 10);
    assert_eq!(config.version, "2.1.0");
}

#[test]
fn development_adds_local_origin_once() {
    let config = Config::resolve(RawConfig {
        app_env: Some("development".into()),
        allowed_origins: Some("http://localhost:3000".into()),
        ..RawConfig::default()
    })
    .unwrap();
    assert_eq!(config.mode, Mode::Development);
    assert_eq!(config.allowed_origins, vec![DEV_ORIGIN.to_string()]);

    let config = Config::resolve(RawConfig {
        app_env: Some("development".into()),
        ..RawConfig::default()
    })
    .unwrap();
    assert_eq!(config.allowed_origins.len(), 3);
    assert!(config.allowed_origins.contains(&DEV_ORIGIN.to_string()));
}

#[test]
fn zero_attempts_is_clamped_to_one() {
    let config = Config::resolve(RawConfig {
        max_reconnect_attempts: Some("0".into()),
        ..RawConfig::default()
    })
    .unwrap();
    assert_eq!(config.reconnect.max_attempts, 1);
}

#[parameterized(
    port = { RawConfig { port: Some("http".into()), ..RawConfig::default() }, "PORT" },
    negative_attempts = { RawConfig { max_reconnect_attempts: Some("-1".into()), ..RawConfig::default() }, "MAX_RECONNECT_ATTEMPTS" },
    delay = { RawConfig { reconnect_delay: Some("5s".into()), ..RawConfig::default() }, "RECONNECT_DELAY" },
    rate_limit = { RawConfig { rate_limit_max: Some("many".into()), ..RawConfig::default() }, "RATE_LIMIT_MAX" },
)]
fn unparsable_numbers_are_errors(raw: RawConfig, var: &str) {
    let err = Config::resolve(raw).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { var: v, .. } if v == var));
    assert!(err.to_string().contains(var));
}
