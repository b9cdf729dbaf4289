use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::GithubError;

/// Errors returned by HTTP handlers, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unprocessable(String),
    /// Message is prefixed with `Scan failed:` by the handler that raised it.
    Internal(String),
}

impl ApiError {
    pub fn scan_failed(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(format!("Scan failed: {}", err))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GithubError> for ApiError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::InvalidUrl(_) => ApiError::Unprocessable(err.to_string()),
            GithubError::RepositoryNotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::scan_failed(other),
        }
    }
}

/// Malformed or incomplete JSON bodies are validation failures, not plain-text 400s.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Unprocessable(m)
            | ApiError::Internal(m) => m,
        };

        if status.is_server_error() {
            error!(%status, detail = %detail, "request failed");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
