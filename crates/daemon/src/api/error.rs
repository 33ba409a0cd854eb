// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use link_core::Error as CoreError;

/// Errors returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or incomplete request.
    BadRequest(String),
    /// Client exceeded its request window.
    RateLimited(&'static str),
    Core(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Core(err) => match err {
                CoreError::InvalidPhone(_)
                | CoreError::EmptyMessage
                | CoreError::MessageTooLong { .. } => StatusCode::BAD_REQUEST,
                CoreError::SessionNotReady => StatusCode::SERVICE_UNAVAILABLE,
                CoreError::PairingRequestFailed(_) | CoreError::SendFailed(_) => {
                    StatusCode::BAD_GATEWAY
                }
                CoreError::TransportInit(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::RateLimited(message) => (*message).to_string(),
            ApiError::Core(err) => match err {
                CoreError::PairingRequestFailed(_) => "pairing code request failed".to_string(),
                CoreError::SendFailed(_) => "message send failed".to_string(),
                CoreError::TransportInit(_) => "internal server error".to_string(),
                // First line only; hints are for operators.
                other => other.to_string().lines().next().unwrap_or_default().to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        if let ApiError::RateLimited(_) = self {
            warn!(event = "rate_limited", "request rejected by rate limit");
            return (status, Json(json!({ "error": message }))).into_response();
        }

        match &self {
            ApiError::Core(err) if status.is_server_error() => {
                error!(event = "request_error", status = status.as_u16(), error = %err, "request failed");
            }
            _ => {
                warn!(event = "request_rejected", status = status.as_u16(), %message, "request rejected");
            }
        }
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
