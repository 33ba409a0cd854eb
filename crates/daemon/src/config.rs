// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Values come from the environment (see [`crate::env`]) with defaults for
//! everything. Command-line flags override individual values afterwards.

use std::path::PathBuf;
use std::time::Duration;

use link_core::ReconnectConfig;
use thiserror::Error;

use crate::env::{self, names};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_AUTH_PATH: &str = "/app/data/auth_info";
pub const DEFAULT_BRIDGE_URL: &str = "ws://127.0.0.1:3002";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://revolta.top,https://revolta-ftvy.vercel.app";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_PAIR_RATE_LIMIT: u32 = 3;
/// Origin added to the allow list in development mode.
pub const DEV_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'\n  hint: expected a non-negative integer")]
    InvalidNumber { var: &'static str, value: String },
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("development") => Mode::Development,
            _ => Mode::Production,
        }
    }
}

/// Unparsed settings as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub app_env: Option<String>,
    pub port: Option<String>,
    pub auth_path: Option<PathBuf>,
    pub bridge_url: Option<String>,
    pub max_reconnect_attempts: Option<String>,
    pub reconnect_delay: Option<String>,
    pub allowed_origins: Option<String>,
    pub log_level: Option<String>,
    pub rate_limit_max: Option<String>,
    pub app_version: Option<String>,
}

impl RawConfig {
    pub fn from_env() -> Self {
        RawConfig {
            app_env: env::app_env(),
            port: env::port(),
            auth_path: env::auth_path(),
            bridge_url: env::bridge_url(),
            max_reconnect_attempts: env::max_reconnect_attempts(),
            reconnect_delay: env::reconnect_delay(),
            allowed_origins: env::allowed_origins(),
            log_level: env::log_level(),
            rate_limit_max: env::rate_limit_max(),
            app_version: env::app_version(),
        }
    }
}

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub port: u16,
    pub auth_path: PathBuf,
    pub bridge_url: String,
    pub reconnect: ReconnectConfig,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
    /// Pairing requests allowed per client per window.
    pub pair_rate_limit: u32,
    pub version: String,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(RawConfig::from_env())
    }

    /// Apply defaults and parse numbers.
    pub fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let mode = Mode::parse(raw.app_env.as_deref());
        let defaults = ReconnectConfig::default();

        let mut allowed_origins: Vec<String> = raw
            .allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if mode == Mode::Development && !allowed_origins.iter().any(|o| o == DEV_ORIGIN) {
            allowed_origins.push(DEV_ORIGIN.to_string());
        }

        Ok(Config {
            mode,
            port: parse_number(names::PORT, raw.port)?.unwrap_or(DEFAULT_PORT),
            auth_path: raw
                .auth_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AUTH_PATH)),
            bridge_url: raw
                .bridge_url
                .unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string()),
            reconnect: ReconnectConfig {
                max_attempts: parse_number(names::MAX_RECONNECT_ATTEMPTS, raw.max_reconnect_attempts)?
                    .unwrap_or(defaults.max_attempts)
                    .max(1),
                base_delay: parse_number(names::RECONNECT_DELAY, raw.reconnect_delay)?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.base_delay),
            },
            allowed_origins,
            log_level: raw
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            pair_rate_limit: parse_number(names::RATE_LIMIT_MAX, raw.rate_limit_max)?
                .unwrap_or(DEFAULT_PAIR_RATE_LIMIT),
            version: raw
                .app_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
