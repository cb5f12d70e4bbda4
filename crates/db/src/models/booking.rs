use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studiobook_core::booking::BookingStatus;
use studiobook_core::types::{DbId, Timestamp};

/// A row from the `bookings` table.
///
/// Cancelled rows are retained (soft state) for capacity recomputation
/// and audit; they are excluded from the live-booking unique index.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub tenant_id: DbId,
    pub lesson_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Status as the core state-machine enum.
    ///
    /// The CHECK constraint on `bookings.status` keeps the stored text
    /// inside the four known values; an unknown value can only come from
    /// out-of-band schema drift and reads as `cancelled` (inert).
    pub fn status(&self) -> BookingStatus {
        BookingStatus::parse(&self.status).unwrap_or(BookingStatus::Cancelled)
    }
}

/// Outcome of a capacity-safe insert attempt.
#[derive(Debug)]
pub enum InsertOutcome {
    /// A seat was free; the booking was inserted as confirmed.
    Confirmed(Booking),
    /// Capacity was exhausted at check time (under the row lock).
    Full,
    /// The lesson vanished between the caller's read and the locked
    /// check. The transaction inserted nothing.
    LessonMissing,
    /// The post-insert recount exceeded `places`; the transaction was
    /// rolled back. Indicates a storage-layer concurrency bug.
    InvariantBreach { places: i32, confirmed: i64 },
}

/// Outcome of flipping an existing booking to confirmed.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// A seat was free; the booking is now confirmed.
    Confirmed(Booking),
    /// Capacity was exhausted at check time (under the row lock).
    Full,
    /// The booking no longer exists.
    Missing,
    /// The booking left a confirmable status before the locked read,
    /// e.g. a racing cancel committed first. `status` is the stored
    /// text at check time.
    TransitionBlocked { status: String },
}

/// DTO for creating a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBooking {
    pub lesson_id: DbId,
    /// Staff may book on behalf of another user; self-service callers
    /// must leave this unset.
    #[serde(default)]
    pub user_id: Option<DbId>,
    /// Desired status: `confirmed`, or `waiting` to join the waitlist
    /// when the class is full.
    pub status: BookingStatus,
    /// Fall back to a waiting entry instead of failing when a confirmed
    /// booking finds the class full.
    #[serde(default)]
    pub join_waitlist_if_full: bool,
}
