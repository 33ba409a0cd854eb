// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP API.
//!
//! - `GET /whatsapp/status` - connection status
//! - `POST /whatsapp/pair` - issue a pairing code
//! - `POST /whatsapp/send` - send a text message
//! - `GET /health`, `/ready`, `/live` - probes

pub mod error;
pub mod health;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use link_core::{MessageSender, PairingCoordinator, StatusReporter};

use crate::ratelimit::{RateLimiter, PAIR_WINDOW, SEND_LIMIT, SEND_WINDOW};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub status: StatusReporter,
    pub pairing: PairingCoordinator,
    pub sender: MessageSender,
    pub pair_limiter: Arc<RateLimiter>,
    pub send_limiter: Arc<RateLimiter>,
    /// Version reported by `/health`.
    pub version: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        status: StatusReporter,
        pairing: PairingCoordinator,
        sender: MessageSender,
        pair_rate_limit: u32,
        version: String,
    ) -> Self {
        Self {
            status,
            pairing,
            sender,
            pair_limiter: Arc::new(RateLimiter::new(pair_rate_limit, PAIR_WINDOW)),
            send_limiter: Arc::new(RateLimiter::new(SEND_LIMIT, SEND_WINDOW)),
            version,
            started_at: Instant::now(),
        }
    }
}

/// Build the HTTP API router.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let whatsapp = Router::new()
        .route("/status", get(routes::status))
        .route("/pair", post(routes::pair))
        .route("/send", post(routes::send));

    Router::new()
        .nest("/whatsapp", whatsapp)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/live", get(health::live))
        .layer(cors(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(event = "cors_origin_invalid", %origin, "ignoring invalid origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
