//! Mapping of pipeline errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lexlink_core::AppError;
use serde_json::json;

/// Body of every internal failure; details only go to the log.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Handler error wrapper.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::MissingInput(message) => {
                tracing::warn!("Rejected request: {}", message);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            err => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": GENERIC_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
