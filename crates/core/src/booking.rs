//! Booking row statuses and the allowed-transition state machine.
//!
//! Cancelled bookings are soft state: the row is retained for capacity
//! recomputation and audit, and no transition leads out of `cancelled`.
//!
//! The database stores the status as lowercase text; [`BookingStatus::as_str`]
//! and [`BookingStatus::parse`] are the single source of truth for that
//! mapping so the `db` crate never hand-writes status literals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Status of a booking row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Waiting,
}

impl BookingStatus {
    /// Lowercase text form stored in the `bookings.status` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Waiting => "waiting",
        }
    }

    /// Parse the stored text form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "waiting" => Some(BookingStatus::Waiting),
            _ => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the set of statuses reachable from `from`.
///
/// `Cancelled` is terminal and returns an empty slice.
pub fn valid_transitions(from: BookingStatus) -> &'static [BookingStatus] {
    match from {
        BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
        BookingStatus::Waiting => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
        BookingStatus::Confirmed => &[BookingStatus::Cancelled],
        BookingStatus::Cancelled => &[],
    }
}

/// Check whether a transition from `from` to `to` is allowed.
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a transition, producing a typed error for invalid ones.
pub fn validate_transition(from: BookingStatus, to: BookingStatus) -> Result<(), BookingError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(BookingError::InvalidTransition { from, to })
    }
}

/// Whether a booking in this status occupies the viewer's place on a
/// lesson (confirmed, or pending confirmation).
pub fn holds_place(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Confirmed | BookingStatus::Pending)
}
