use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller must configure something (e.g. an AI provider) first.
    #[error("Precondition required: {0}")]
    PreconditionRequired(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited { provider, .. } => AppError::RateLimited(format!(
                "{provider} API rate limit exceeded. Please wait a moment and try again."
            )),
            LlmError::MissingApiKey(provider) => AppError::PreconditionRequired(format!(
                "API key is required for the selected provider ({provider})"
            )),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized(msg) => {
                tracing::debug!("Rejected request: {msg}");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required".to_string(),
                )
            }
            AppError::PreconditionRequired(msg) => (
                StatusCode::PRECONDITION_REQUIRED,
                "PRECONDITION_REQUIRED",
                msg.clone(),
            ),
            AppError::RateLimited(msg) => {
                tracing::warn!("Provider rate limit: {msg}");
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ai_settings::AiProvider;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::PreconditionRequired("x".into()),
                StatusCode::PRECONDITION_REQUIRED,
            ),
            (AppError::RateLimited("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (AppError::Llm("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_rate_limit_message_names_provider() {
        let err: AppError = LlmError::RateLimited {
            provider: AiProvider::OpenAi,
            retries: 3,
        }
        .into();
        match err {
            AppError::RateLimited(msg) => assert_eq!(
                msg,
                "OpenAI API rate limit exceeded. Please wait a moment and try again."
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_maps_to_precondition() {
        let err: AppError = LlmError::MissingApiKey(AiProvider::Gemini).into();
        assert!(matches!(err, AppError::PreconditionRequired(_)));
    }
}
