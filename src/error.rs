// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{message::ErrorResponse, services::inference::InferenceError};

/// Every failure of the proxy endpoint. All of them map to the same 500
/// envelope; only `details` differs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Inference(#[from] InferenceError),

    #[error("prompt is not a string: {0}")]
    InvalidPrompt(String),

    #[error("invalid request body: {0}")]
    BadBody(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = self.to_string();
        error!(%details, "chat request failed");

        let body = ErrorResponse {
            error: "Server error".to_string(),
            details,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
