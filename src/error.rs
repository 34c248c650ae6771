//!
//! # Custom Error Handling
//!
//! Defines the `AppError` type used throughout the application. It centralizes
//! error management so that auth and task services can return one error type,
//! and the transport layer converts each variant to the right HTTP response.
//!
//! `AppError` implements `actix_web::error::ResponseError` to turn application
//! errors into JSON error responses. `From` impls for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, and
//! `bcrypt::BcryptError` allow conversion with the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All error conditions the application can surface to a client.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or a valid token is required but missing (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but does not own the referenced resource (HTTP 403).
    Forbidden(String),
    /// A malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// The referenced resource does not exist (HTTP 404).
    NotFound(String),
    /// The request conflicts with existing state, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Input failed validation (HTTP 422).
    ValidationError(String),
    /// An error from the database layer (HTTP 500, details never sent to the client).
    DatabaseError(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            // Store errors are logged server-side; the client only sees a generic message.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, a unique-constraint violation maps to
/// `Conflict` (covers the register race where two inserts pass the duplicate
/// check), and anything else becomes `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Resource already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// JWT processing failures (bad signature, expiry, malformed token) are 401s.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Bcrypt failures during hashing or verification are internal errors, not
/// authentication failures.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("Access denied".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Conflict("Email already registered".into());
        assert_eq!(error.error_response().status(), 409);

        let error = AppError::ValidationError("title too long".into());
        assert_eq!(error.error_response().status(), 422);

        let error = AppError::InternalServerError("boom".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_database_error_body_is_generic() {
        // Raw store errors must never reach the client.
        let error = AppError::DatabaseError("connection refused to 10.0.0.5".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_jwt_error_maps_to_unauthorized() {
        let jwt_err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        match AppError::from(jwt_err) {
            AppError::Unauthorized(_) => {}
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }
}
