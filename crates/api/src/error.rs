use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use studiobook_core::error::BookingError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`BookingError`] for domain outcomes and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level outcome from the booking engine.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or malformed gateway identity headers.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller identity is valid but may not perform the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A conflicting live record already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Booking engine outcomes ---
            AppError::Booking(booking) => match booking {
                BookingError::ClassFull => (
                    StatusCode::CONFLICT,
                    "CLASS_FULL",
                    booking.to_string(),
                ),
                BookingError::BookingWindowClosed => (
                    StatusCode::CONFLICT,
                    "BOOKING_WINDOW_CLOSED",
                    booking.to_string(),
                ),
                BookingError::NotEligible(_) => {
                    (StatusCode::FORBIDDEN, "NOT_ELIGIBLE", booking.to_string())
                }
                BookingError::LessonNotFound { .. } | BookingError::BookingNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", booking.to_string())
                }
                BookingError::InvalidTransition { .. } => (
                    StatusCode::CONFLICT,
                    "INVALID_TRANSITION",
                    booking.to_string(),
                ),
                BookingError::InvariantViolation(msg) => {
                    tracing::error!(error = %msg, "Capacity invariant violation");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INVARIANT_VIOLATION",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409 — e.g. the one-live-booking-per-user index.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
