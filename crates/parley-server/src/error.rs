//! Mapping of request failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley_history::HistoryError;
use serde::Serialize;

pub const INVALID_INDEX: &str = "Invalid index.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range client input.
    #[error("{0}")]
    Validation(String),

    /// The model provider call failed.
    #[error("{0}")]
    Upstream(String),
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        tracing::debug!("{err}");
        ApiError::Validation(INVALID_INDEX.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
