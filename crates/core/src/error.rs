use crate::booking::BookingStatus;
use crate::types::DbId;

/// Domain-level failures of the booking engine.
///
/// Expected, user-facing outcomes (`ClassFull`, `BookingWindowClosed`,
/// `NotEligible`) are typed results for the API layer to map onto HTTP
/// statuses — they are not exceptional control flow. `InvariantViolation`
/// is the one fatal variant: it means the storage layer let a
/// capacity-safe insert overshoot and must be surfaced to operators.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Capacity is exhausted and the caller did not accept a waiting spot.
    #[error("Class is fully booked")]
    ClassFull,

    /// The lockout window has passed and the viewer holds no booking.
    #[error("Booking window has closed for this lesson")]
    BookingWindowClosed,

    /// No active subscription to an allowed plan and no drop-in path.
    #[error("Not eligible to book this class: {0}")]
    NotEligible(String),

    /// Lesson deleted or invalid id. A hard failure for the initiating
    /// call; reconciliation steps treat the same condition as a no-op.
    #[error("Lesson with id {id} not found")]
    LessonNotFound { id: DbId },

    /// Booking deleted or invalid id.
    #[error("Booking with id {id} not found")]
    BookingNotFound { id: DbId },

    /// A status change outside the allowed transition table.
    #[error("Invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// A capacity-safe insert's post-condition check failed. Indicates a
    /// storage-layer concurrency bug; must be logged, never swallowed.
    #[error("Capacity invariant violated: {0}")]
    InvariantViolation(String),
}
