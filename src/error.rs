//! API error types and RFC 7807 problem responses.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error code carried alongside the problem body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    UnsupportedMediaType,
    UnprocessableEntity,
    RateLimited,
    NotFound,
    Internal,
}

/// Errors surfaced by the HTTP layer. Core engine operations are
/// infallible; everything here is raised before or around the engine.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation.
    #[error("{0}")]
    InvalidArgument(String),

    /// Body was not application/json.
    #[error("expected application/json")]
    UnsupportedMediaType,

    /// Body parsed but did not match the expected shape.
    #[error("{0}")]
    UnprocessableEntity(String),

    /// Too many requests.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Unknown route or gated endpoint.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected server-side failure.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    /// The problem code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ApiError::UnsupportedMediaType => ErrorCode::UnsupportedMediaType,
            ApiError::UnprocessableEntity(_) => ErrorCode::UnprocessableEntity,
            ApiError::RateLimited => ErrorCode::RateLimited,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// The HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// RFC 7807 problem body, extended with `code` and a per-request id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: ErrorCode,
    pub request_id: String,
}

impl From<&ApiError> for Problem {
    fn from(error: &ApiError) -> Self {
        let status = error.status();
        Problem {
            problem_type: "about:blank",
            title: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            status: status.as_u16(),
            detail: error.to_string(),
            code: error.code(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let problem = Problem::from(&self);
        tracing::debug!(code = ?problem.code, request_id = %problem.request_id, "request failed: {}", problem.detail);
        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
