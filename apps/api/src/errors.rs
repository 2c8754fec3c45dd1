use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::template::renderer::RenderError;
use crate::typeset::compiler::CompileError;
use crate::typeset::log_parser::CompileFailure;
use crate::typeset::workspace::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Compile failed: {0}")]
    Compile(CompileFailure),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("AI tailoring is not configured")]
    TailoringUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Failed(failure) => AppError::Compile(failure),
            CompileError::Workspace(e) => {
                AppError::Internal(anyhow::Error::new(e).context("typeset workspace io failure"))
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Render(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "RENDER_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Compile(failure) => {
                // The kind and excerpt are the user-facing diagnostic; the
                // raw log stays on disk for debugging.
                let detail = serde_json::to_value(failure).ok();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "COMPILE_ERROR",
                    failure.to_string(),
                    detail,
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                    None,
                )
            }
            AppError::TailoringUnavailable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TAILORING_UNAVAILABLE",
                "AI tailoring is not configured; set ANTHROPIC_API_KEY to enable it".to_string(),
                None,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        if let Some(detail) = detail {
            body["error"]["detail"] = detail;
        }

        (status, Json(body)).into_response()
    }
}
