// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-window request limits keyed by client address.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Pairing requests: `RATE_LIMIT_MAX` per this window.
pub const PAIR_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Send requests allowed per [`SEND_WINDOW`].
pub const SEND_LIMIT: u32 = 10;
pub const SEND_WINDOW: Duration = Duration::from_secs(60);

/// Tracked clients above which expired windows are pruned.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Allows `max` requests per client per `window`.
#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        RateLimiter {
            max,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `client`. False once its window is full.
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    pub(crate) fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock();
        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }
        if entry.hits >= self.max {
            return false;
        }
        entry.hits += 1;
        true
    }
}

#[cfg(test)]
#[path = "ratelimit_tests.rs"]
mod tests;
