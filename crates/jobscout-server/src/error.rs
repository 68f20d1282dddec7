use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use jobscout_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Page-level failures never reach here; whatever does aborted the query.
        tracing::error!(error = %self.0, "Search failed");

        let body = ErrorResponse {
            error: "internal_error".to_string(),
            message: self.0.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
