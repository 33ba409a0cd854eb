// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Health, readiness and liveness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "linkd";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: String,
    /// Seconds since the daemon started.
    pub uptime: f64,
    pub whatsapp: LinkHealth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkHealth {
    pub connected: bool,
    pub reconnect_attempts: u32,
    /// Account number, only while connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// GET /health: 200 while connected, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let status = state.status.status();
    let user = status.user.clone().filter(|_| status.connected);

    let report = HealthReport {
        status: if status.connected {
            "healthy"
        } else {
            "unhealthy"
        },
        timestamp: status.timestamp,
        service: SERVICE_NAME,
        version: state.version.clone(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        whatsapp: LinkHealth {
            connected: status.connected,
            reconnect_attempts: status.reconnect_attempts,
            user,
        },
    };
    (probe_status(status.connected), Json(report))
}

/// GET /ready
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    probe_status(state.status.status().connected)
}

/// GET /live
pub async fn live() -> StatusCode {
    StatusCode::OK
}

fn probe_status(connected: bool) -> StatusCode {
    if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
