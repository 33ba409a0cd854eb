// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Status, pairing and send endpoints.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use link_core::{phone, validate_message, ConnectionStatus};

use super::error::ApiError;
use super::AppState;

const PAIR_LIMIT_MESSAGE: &str = "Too many pairing attempts. Try again in 15 minutes.";
const SEND_LIMIT_MESSAGE: &str = "Message limit exceeded. Try again in 1 minute.";
const PAIR_MESSAGE: &str = "Code generated. Enter it in WhatsApp within 1 minute.";
const SENT_MESSAGE: &str = "Message sent";

#[derive(Debug, Deserialize)]
pub struct PairRequest {
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairResponse {
    pub code: String,
    pub message: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /whatsapp/status
pub async fn status(State(state): State<AppState>) -> Json<ConnectionStatus> {
    Json(state.status.status())
}

/// POST /whatsapp/pair
pub async fn pair(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<PairRequest>, JsonRejection>,
) -> Result<Json<PairResponse>, ApiError> {
    if !state.pair_limiter.check(peer.ip()) {
        return Err(ApiError::RateLimited(PAIR_LIMIT_MESSAGE));
    }

    let Json(request) = payload?;
    let phone = required(request.phone, "phone is required")?;
    let digits = phone::normalize(&phone)?;

    info!(event = "pair_request", ip = %peer.ip(), "pairing request received");
    let code = state.pairing.issue_code(&digits).await?;

    Ok(Json(PairResponse {
        expires_in: code.expires_in_secs(code.issued_at),
        code: code.code,
        message: PAIR_MESSAGE,
    }))
}

/// POST /whatsapp/send
pub async fn send(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    if !state.send_limiter.check(peer.ip()) {
        return Err(ApiError::RateLimited(SEND_LIMIT_MESSAGE));
    }

    let Json(request) = payload?;
    let missing = "number and message are required";
    let number = required(request.number, missing)?;
    let message = required(request.message, missing)?;

    validate_message(&message)?;
    let digits = phone::normalize(&number)?;

    state.sender.send_text(&digits, &message).await?;
    Ok(Json(SendResponse {
        success: true,
        message: SENT_MESSAGE,
    }))
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
