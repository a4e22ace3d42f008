pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: Integer error code for logging/monitoring (e.g., 1007)
/// - `error`: Machine-readable error identifier (e.g., "FORBIDDEN")
/// - `message`: Human-readable message, shown verbatim by the UI
/// - `details`: Optional structured details (e.g., validation errors)
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "title: Title is required",
///   "details": { "title": [ { "code": "blank", ... } ] }
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("CSRF token missing or invalid")]
    CsrfTokenMismatch,

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::InvalidUuid(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Forbidden(_) | AppError::CsrfTokenMismatch => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Error code reported in the response body.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::Session(_) => ErrorCode::SessionError,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::InvalidUuid(_) => ErrorCode::InvalidUuid,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::CsrfTokenMismatch => ErrorCode::CsrfTokenMismatch,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        let (message, details) = match self {
            AppError::Database(e) => {
                tracing::error!(error_code = code.code(), "Database error: {:?}", e);
                (code.default_message().to_string(), None)
            }
            AppError::Session(e) => {
                tracing::error!(error_code = code.code(), "Session error: {:?}", e);
                (code.default_message().to_string(), None)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {}", e);
                let details = serde_json::to_value(&e).ok();
                (e.to_string(), details)
            }
            AppError::CsrfTokenMismatch => {
                tracing::warn!(error_code = code.code(), "Rejected request with bad CSRF token");
                (code.default_message().to_string(), None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (msg, None)
            }
            AppError::InvalidUuid(id) => {
                tracing::info!(error_code = code.code(), "Invalid UUID: {}", id);
                (format!("Invalid UUID: {}", id), None)
            }
            AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), status = %status, "{}", msg);
                (msg, None)
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Helper function to create error responses outside of `AppError`.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
