use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use procedura_core::error::InferenceError;
use procedura_flows::FlowError;

/// Prefix of every 500 response body.
pub const INTERNAL_PREFIX: &str = "Erro ao processar a solicitação: ";

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{INTERNAL_PREFIX}{msg}"),
                )
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<InferenceError> for ApiError {
    fn from(e: InferenceError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<FlowError> for ApiError {
    fn from(e: FlowError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Reject blank `text` fields before any step runs.
pub fn require_text(text: &str) -> Result<&str, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(
            "O campo 'text' não pode estar vazio.".to_string(),
        ));
    }
    Ok(trimmed)
}
