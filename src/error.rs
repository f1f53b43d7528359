//! Application error types with Axum response mapping.
//!
//! Each variant maps to a fixed HTTP status and body. Guard rejections are
//! variants too, so the middleware can short-circuit with `?`.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::antiforgery::AntiforgeryError;
use crate::validation::FormResult;

/// Body of the format rejection.
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "The request is not in the expected format";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Antiforgery token validation failed: {0}")]
    Antiforgery(#[from] AntiforgeryError),

    #[error("{}", UNEXPECTED_FORMAT_MESSAGE)]
    UnexpectedFormat,

    #[error("Model validation failed")]
    ValidationFailed(FormResult),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Request body could not be read: {0}")]
    BodyUnreadable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Antiforgery(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Antiforgery token validation failed",
                    "message": e.to_string()
                }),
            ),
            AppError::UnexpectedFormat => {
                return (
                    StatusCode::BAD_REQUEST,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    UNEXPECTED_FORMAT_MESSAGE,
                )
                    .into_response();
            }
            AppError::ValidationFailed(result) => return result.into_response(),
            AppError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({
                    "error": "Payload too large",
                    "message": format!("Request body exceeds {limit} bytes")
                }),
            ),
            AppError::BodyUnreadable(msg) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Request body could not be read", "message": msg}),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": msg}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
