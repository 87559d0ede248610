//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::AppError,
    state::{SessionStatus, TimerSnapshot},
};

/// Envelope for every successful mutation and every error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a new API response
    pub fn new(status: &str, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            data,
        }
    }

    /// Create a success response carrying `data`
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new("ok", message, Some(data))
    }
}

impl ApiResponse<()> {
    /// Create a success response without a payload
    pub fn done(message: impl Into<String>) -> Self {
        Self::new("ok", message, None)
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message, None)
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::IndexOutOfRange { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RecipeNotFound(_) | AppError::StepOutOfRange { .. } => StatusCode::NOT_FOUND,
            AppError::NotViewing
            | AppError::NoActiveTimer
            | AppError::NoTimerForStep(_)
            | AppError::NoDraft => StatusCode::CONFLICT,
            AppError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}

/// Session status plus server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(flatten)]
    pub session: SessionStatus,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Body of `POST /view/servings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingsRequest {
    pub servings: u32,
}

/// Query of `GET /recipes/:id/scaled`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleQuery {
    pub servings: u32,
}

/// Timer mutation response
pub type TimerResponse = ApiResponse<TimerSnapshot>;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
