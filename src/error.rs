//! Domain error types for the dashboard server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Underlying store unreachable or a query failed
    #[error("Store error: {0}")]
    Store(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed request body or parameters
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Upstream CI system (Jenkins) failed or is not configured
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, message) = match self {
            AppError::Store(detail) => {
                // Driver detail is logged server-side only, never returned.
                tracing::error!("Store error: {}", detail);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal storage error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => (actix_web::http::StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation(_) => {
                (actix_web::http::StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Unauthorized(_) => {
                (actix_web::http::StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::Forbidden(_) => (actix_web::http::StatusCode::FORBIDDEN, self.to_string()),
            AppError::Upstream(detail) => {
                tracing::error!("Upstream error: {}", detail);
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "Upstream CI system request failed".to_string(),
                )
            }
        };

        HttpResponse::build(status).json(ErrorEnvelope {
            success: false,
            message,
        })
    }
}

/// Error response body. Every non-2xx response uses this envelope.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false` for errors.
    pub success: bool,
    pub message: String,
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Store("down".into()).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("Execution 7".into())
                .error_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("bad".into()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("no token".into())
                .error_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("role".into()).error_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Upstream("jenkins".into())
                .error_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
