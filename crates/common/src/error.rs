//! Error types for institute-rs.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Breakdown of dependent-record counts for a deletable entity.
///
/// Every dependent category is always present, zero included, so the
/// caller can render a complete warning banner. Keys are the camelCase
/// category names used on the wire (`attendances`, `enrollments`,
/// `payments`, `classSections`).
pub type RelatedRecords = BTreeMap<String, u64>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Teacher not found: {0}")]
    TeacherNotFound(String),

    /// Soft delete or permanent delete attempted on an archived row.
    #[error("{0} is already deleted")]
    AlreadyDeleted(String),

    /// Restore attempted on a row that is not archived.
    #[error("{0} is not deleted")]
    NotDeleted(String),

    /// Deletion blocked because dependent records exist and no cascade
    /// was requested. Carries the per-category counts for the caller.
    #[error("Cannot delete {entity}: related records exist")]
    BlockedByDependents {
        entity: String,
        details: RelatedRecords,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::StudentNotFound(_) | Self::TeacherNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::AlreadyDeleted(_)
            | Self::NotDeleted(_)
            | Self::BlockedByDependents { .. }
            | Self::BadRequest(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::TeacherNotFound(_) => "TEACHER_NOT_FOUND",
            Self::AlreadyDeleted(_) => "ALREADY_DELETED",
            Self::NotDeleted(_) => "NOT_DELETED",
            Self::BlockedByDependents { .. } => "BLOCKED_BY_DEPENDENTS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Server-side detail stays in the logs; callers get a generic message.
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = match &self {
            // The deletion dialog consumes this shape directly: the
            // per-category counts plus the hint that cascade is available.
            Self::BlockedByDependents { entity, details } => Json(json!({
                "error": format!("Cannot delete {entity}: related records exist"),
                "details": details,
                "canCascade": true,
            })),
            Self::Database(_) | Self::Internal(_) => Json(json!({
                "error": {
                    "code": code,
                    "message": "An internal error occurred",
                }
            })),
            _ => Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                }
            })),
        };

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
