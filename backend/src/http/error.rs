//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::DashboardError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Error raised by the dashboard library
    Dashboard(DashboardError),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ApiError) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Dashboard(err) => {
                let details = err.context().map(|ctx| ctx.to_string());
                let (status, error) = match &err {
                    DashboardError::Load { message, .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("LOAD_ERROR", message.clone()),
                    ),
                    DashboardError::NotFound { message, .. } => {
                        (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message.clone()))
                    }
                    DashboardError::InvalidInput { message, .. } => {
                        (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", message.clone()))
                    }
                    DashboardError::Configuration { message } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("CONFIGURATION_ERROR", message.clone()),
                    ),
                };
                match details {
                    Some(details) => (status, error.with_details(details)),
                    None => (status, error),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(code = %error.code, "{}", error.message);
        }
        (status, Json(error)).into_response()
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        AppError::Dashboard(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
