//! Error handling
//!
//! Defines every error the service can surface and how each one is turned
//! into an HTTP response with the `{success, message, error_code}` envelope.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// PostgreSQL SQLSTATE for unique violations.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Toggle whether internal error details are echoed back to clients.
/// Only enabled when running in `development`.
pub fn expose_error_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

fn details_enabled() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unique constraint violation, carrying the constraint name.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Foreign key violation, carrying the constraint name.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// One field-level validation message.
#[derive(Debug, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error body returned by the API
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    error_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error_code: &'static str) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code,
            errors: None,
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        if details_enabled() {
            self.details = Some(details);
        }
        self
    }
}

impl AppError {
    /// HTTP status and short machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Duplicate(_) => (StatusCode::CONFLICT, "DUPLICATE_ENTRY"),
            AppError::InvalidReference(_) => (StatusCode::BAD_REQUEST, "INVALID_REFERENCE"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            AppError::Jwt(_) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::Hash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "HASH_ERROR"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// True when this is a unique violation on the given constraint.
    pub fn is_duplicate_of(&self, constraint: &str) -> bool {
        matches!(self, AppError::Duplicate(name) if name == constraint)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match self {
            AppError::Database(e) => {
                error!("💥 Database error: {}", e);
                ErrorResponse::new("An error occurred while accessing the database", code)
                    .with_details(json!({ "sql_error": e.to_string() }))
            }
            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                let mut body = ErrorResponse::new("Validation failed", code);
                body.errors = Some(field_errors(&e));
                body
            }
            AppError::Duplicate(constraint) => {
                warn!("Duplicate entry on {}", constraint);
                ErrorResponse::new("Duplicate entry detected", code)
                    .with_details(json!({ "constraint": constraint }))
            }
            AppError::InvalidReference(constraint) => {
                warn!("Invalid reference on {}", constraint);
                ErrorResponse::new("Invalid reference to related data", code)
                    .with_details(json!({ "constraint": constraint }))
            }
            AppError::Internal(msg) => {
                error!("💥 Internal error: {}", msg);
                ErrorResponse::new("An unexpected error occurred", code)
                    .with_details(json!({ "internal_error": msg }))
            }
            AppError::Hash(msg) => {
                error!("💥 Hash error: {}", msg);
                ErrorResponse::new("An error occurred while processing credentials", code)
                    .with_details(json!({ "hash_error": msg }))
            }
            AppError::Storage(msg) => {
                error!("💥 Storage error: {}", msg);
                ErrorResponse::new("An error occurred while storing the file", code)
                    .with_details(json!({ "storage_error": msg }))
            }
            AppError::RateLimitExceeded => {
                ErrorResponse::new("Too many requests, please try again later", code)
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Jwt(msg) => ErrorResponse::new(msg, code),
        };

        (status, Json(body)).into_response()
    }
}

/// Flatten `validator` errors into `{field, message}` pairs.
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Classify a `sqlx` error, turning constraint violations into
/// `Duplicate` / `InvalidReference` so callers can react to them.
pub fn db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        let constraint = db.constraint().unwrap_or("unknown").to_string();
        match db.code().as_deref() {
            Some(PG_UNIQUE_VIOLATION) => return AppError::Duplicate(constraint),
            Some(PG_FOREIGN_KEY_VIOLATION) => return AppError::InvalidReference(constraint),
            _ => {}
        }
    }
    AppError::Database(e)
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Helper for single-field validation errors
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Helper for missing resources
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Helper for role/ownership failures
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Duplicate("x".into()).status_and_code(),
            (StatusCode::CONFLICT, "DUPLICATE_ENTRY")
        );
        assert_eq!(
            AppError::InvalidReference("x".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_REFERENCE")
        );
        assert_eq!(
            AppError::RateLimitExceeded.status_and_code().0,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            not_found_error("Visitor").status_and_code(),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
    }

    #[test]
    fn test_is_duplicate_of() {
        let err = AppError::Duplicate("employees_company_code_key".into());
        assert!(err.is_duplicate_of("employees_company_code_key"));
        assert!(!err.is_duplicate_of("users_email_key"));
        assert!(!AppError::Conflict("x".into()).is_duplicate_of("x"));
    }

    #[test]
    fn test_validation_error_helper_keeps_message() {
        match validation_error("phone", "Phone must be 10 digits") {
            AppError::Validation(errors) => {
                let fields = field_errors(&errors);
                assert_eq!(
                    fields,
                    vec![FieldError {
                        field: "phone".into(),
                        message: "Phone must be 10 digits".into()
                    }]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_database_sqlx_error_stays_database() {
        assert!(matches!(db_error(sqlx::Error::RowNotFound), AppError::Database(_)));
    }
}
