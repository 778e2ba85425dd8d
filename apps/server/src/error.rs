//! # API Errors
//!
//! Every handler returns `Result<_, ApiError>`. The error is rendered as
//! `{"code": "...", "message": "..."}` with the status from [`ErrorCode`].
//!
//! ```text
//! DbError / AssistError ──► ApiError { code, message } ──► HTTP response
//! ```
//!
//! Infrastructure failures are logged in full and reported with a generic
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use pantry_assist::AssistError;
use pantry_core::ValidationError;
use pantry_db::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    DuplicateName,
    DuplicateBarcode,
    InvalidArgument,
    ValidationError,
    NotConfigured,
    ExternalServiceError,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DuplicateName
            | ErrorCode::DuplicateBarcode
            | ErrorCode::InvalidArgument
            | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ExternalServiceError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let code = match &err {
            DbError::NotFound { .. } => ErrorCode::NotFound,
            DbError::DuplicateName { .. } => ErrorCode::DuplicateName,
            DbError::DuplicateBarcode { .. } => ErrorCode::DuplicateBarcode,
            DbError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            DbError::Validation(_) => ErrorCode::ValidationError,
            DbError::UniqueViolation { .. } => ErrorCode::InvalidArgument,
            _ => {
                error!(error = %err, "Database error");
                return ApiError::new(ErrorCode::DatabaseError, "A database error occurred");
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<AssistError> for ApiError {
    fn from(err: AssistError) -> Self {
        match err {
            AssistError::NotConfigured(_) => ApiError::new(ErrorCode::NotConfigured, err.to_string()),
            AssistError::EmptyInventory => ApiError::invalid(err.to_string()),
            AssistError::Http { service, .. } => {
                error!(error = %err, "External service unreachable");
                ApiError::new(
                    ErrorCode::ExternalServiceError,
                    format!("{service} request failed"),
                )
            }
            _ => {
                error!(error = %err, "External service error");
                ApiError::new(ErrorCode::ExternalServiceError, err.to_string())
            }
        }
    }
}

/// 503 for a collaborator without an API key.
pub(crate) fn not_configured(service: &'static str, env_var: &str) -> ApiError {
    ApiError::new(
        ErrorCode::NotConfigured,
        format!(
            "{}. Set {} environment variable.",
            AssistError::NotConfigured(service),
            env_var
        ),
    )
}
