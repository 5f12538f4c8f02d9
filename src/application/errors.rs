use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domain::RepositoryError;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Wallpaper not found")]
    NotFound,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::Conflict(message) | RepositoryError::Unexpected(message) => {
                AppError::Unexpected(message)
            }
        }
    }
}

/// JSON error envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Wrapper that renders an `AppError` as `{code, message}` with the mapped status.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(AppError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let message = match &self.0 {
            AppError::Unexpected(detail) => {
                error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            code: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Failures of a single market's fetch-and-dedupe step.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to reach upstream image API: {0}")]
    Transport(String),
    #[error("upstream image API returned status {0}")]
    UnexpectedStatus(u16),
    #[error("upstream response contained no images")]
    EmptyResponse,
    #[error("failed to parse upstream response: {0}")]
    Parse(String),
    #[error("upstream image entry is invalid: {0}")]
    InvalidEntry(String),
    #[error("a wallpaper for {date} / {market} was inserted concurrently")]
    ConstraintViolation { date: String, market: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
