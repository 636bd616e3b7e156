use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Request body too large")]
    PayloadTooLarge,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    /// HTTP status and stable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Template(TemplateError::RenderFailed(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "RENDER_FAILED")
            }
            AppError::Template(e) => (StatusCode::BAD_REQUEST, e.code()),
            AppError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND")
            }
            AppError::Store(StoreError::AlreadyExists(_)) => {
                (StatusCode::CONFLICT, "TEMPLATE_EXISTS")
            }
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let log_message = self.to_string();

        // Server-side failures never expose internals in production
        let client_message = if status.is_server_error() && is_production() {
            status
                .canonical_reason()
                .unwrap_or("Internal server error")
                .to_string()
        } else {
            log_message.clone()
        };

        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::debug!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::InvalidPayload(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_template_errors_map_to_client_errors() {
        let err = AppError::from(TemplateError::MalformedTemplate("x".into()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "MALFORMED_TEMPLATE")
        );

        let err = AppError::from(TemplateError::TooManyVariables { max: 50 });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "TOO_MANY_VARIABLES")
        );

        let err = AppError::from(TemplateError::RenderFailed("sink".into()));
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_errors() {
        let err = AppError::from(StoreError::NotFound(Uuid::nil()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND")
        );

        let err = AppError::from(StoreError::Postgres(sqlx::Error::PoolTimedOut));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::Validation("invalid template ID".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_errors() {
        let err = AppError::InvalidPayload("missing field `name`".into());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD")
        );
        assert_eq!(
            AppError::PayloadTooLarge.into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_transparent_display() {
        let err = AppError::from(TemplateError::InvalidVariableName("bad".into()));
        assert_eq!(err.to_string(), "Invalid variable name: bad");
    }
}
