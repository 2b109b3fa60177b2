// HTTP response utilities for dashboard errors
use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::domain::error::DashboardError;

/// Everything a handler can fail with, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    /// The request body or path could not be decoded.
    #[error("{0}")]
    Rejected(String),

    #[error("failed to render dashboard page: {0}")]
    Render(#[from] askama::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Dashboard(DashboardError::SessionClosed) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Dashboard(_) | Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Dashboard request failed");
        } else {
            tracing::debug!(error = %self, "Rejected dashboard request");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
