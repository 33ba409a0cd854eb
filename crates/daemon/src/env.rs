// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Every variable linkd reads is named in the generated [`names`] module.
//! Accessors return the raw value; parsing happens in [`crate::config`].

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

/// Non-empty value of `name`, if set.
fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn app_env() -> Option<String> {
    var(names::APP_ENV)
}

pub fn port() -> Option<String> {
    var(names::PORT)
}

pub fn auth_path() -> Option<PathBuf> {
    var(names::AUTH_PATH).map(PathBuf::from)
}

pub fn bridge_url() -> Option<String> {
    var(names::BRIDGE_URL)
}

pub fn max_reconnect_attempts() -> Option<String> {
    var(names::MAX_RECONNECT_ATTEMPTS)
}

pub fn reconnect_delay() -> Option<String> {
    var(names::RECONNECT_DELAY)
}

pub fn allowed_origins() -> Option<String> {
    var(names::ALLOWED_ORIGINS)
}

pub fn log_level() -> Option<String> {
    var(names::LOG_LEVEL)
}

pub fn rate_limit_max() -> Option<String> {
    var(names::RATE_LIMIT_MAX)
}

pub fn app_version() -> Option<String> {
    var(names::APP_VERSION)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
