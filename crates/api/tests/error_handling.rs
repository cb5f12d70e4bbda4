//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use studiobook_api::error::AppError;
use studiobook_core::booking::BookingStatus;
use studiobook_core::error::BookingError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: ClassFull maps to 409 with CLASS_FULL code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn class_full_returns_409() {
    let err = AppError::Booking(BookingError::ClassFull);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CLASS_FULL");
}

// ---------------------------------------------------------------------------
// Test: BookingWindowClosed maps to 409 with BOOKING_WINDOW_CLOSED code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn booking_window_closed_returns_409() {
    let err = AppError::Booking(BookingError::BookingWindowClosed);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "BOOKING_WINDOW_CLOSED");
}

// ---------------------------------------------------------------------------
// Test: NotEligible maps to 403 with NOT_ELIGIBLE code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_eligible_returns_403() {
    let err = AppError::Booking(BookingError::NotEligible(
        "No active subscription to an allowed plan".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "NOT_ELIGIBLE");
}

// ---------------------------------------------------------------------------
// Test: LessonNotFound / BookingNotFound map to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_errors_return_404() {
    let (status, json) =
        error_to_response(AppError::Booking(BookingError::LessonNotFound { id: 42 })).await;
    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Lesson with id 42 not found");

    let (status, json) =
        error_to_response(AppError::Booking(BookingError::BookingNotFound { id: 7 })).await;
    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: InvalidTransition maps to 409 and names both endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Booking(BookingError::InvalidTransition {
        from: BookingStatus::Cancelled,
        to: BookingStatus::Confirmed,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(
        json["error"],
        "Invalid booking transition: cancelled -> confirmed"
    );
}

// ---------------------------------------------------------------------------
// Test: InvariantViolation maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invariant_violation_returns_500_and_sanitizes_message() {
    let err = AppError::Booking(BookingError::InvariantViolation(
        "lesson 3: 9 confirmed bookings for 8 places".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INVARIANT_VIOLATION");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: Unauthorized / Forbidden / Conflict / BadRequest pass-throughs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_variants_map_directly() {
    let (status, json) =
        error_to_response(AppError::Unauthorized("Missing x-user-id header".into())).await;
    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = error_to_response(AppError::Forbidden("Not your booking".into())).await;
    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, json) =
        error_to_response(AppError::Conflict("User already has a booking".into())).await;
    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let (status, json) = error_to_response(AppError::BadRequest("bad payload".into())).await;
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: sqlx RowNotFound maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sqlx_row_not_found_returns_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: InternalError maps to 500 and does not leak details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret connection string".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(
        !json.to_string().contains("secret"),
        "Internal error response must not leak details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}
