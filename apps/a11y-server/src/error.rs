//! Error types for the suggestion server
//!
//! Status mapping: missing AI configuration is a server-side 500, upstream
//! provider failures surface as 502, report rendering failures as 500 (408
//! for render timeouts). Malformed request bodies are rejected by the
//! framework's JSON extractor before a handler runs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use llm_client::LlmError;
use report_engine::ReportError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("AI suggestions are not configured")]
    AiNotConfigured,

    #[error(transparent)]
    Upstream(LlmError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured => ApiError::AiNotConfigured,
            other => ApiError::Upstream(other),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::AiNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI_NOT_CONFIGURED",
                self.to_string(),
            ),
            ApiError::Upstream(err) => {
                tracing::error!("upstream failure: {}", err);
                (StatusCode::BAD_GATEWAY, "UPSTREAM_FAILED", err.to_string())
            }
            ApiError::Report(ReportError::Timeout(ms)) => (
                StatusCode::REQUEST_TIMEOUT,
                "REPORT_TIMEOUT",
                format!("Report rendering timed out after {}ms", ms),
            ),
            ApiError::Report(err) => {
                tracing::error!("report failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPORT_FAILED",
                    err.to_string(),
                )
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
