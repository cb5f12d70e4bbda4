//! Per-viewer booking availability for a lesson.
//!
//! Availability is a projection over two independently-mutating facts
//! (the lesson's bookings and wall-clock time), so it is recomputed on
//! every read and never cached or persisted. Persisting it would require
//! timer-driven recomputation anyway and would add a second invariant to
//! keep synchronized for no benefit.

use serde::Serialize;

use crate::lockout::window_closed;
use crate::types::Timestamp;

/// What a specific viewer can do with a lesson right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Seats remain and the window is open.
    Open,
    /// The viewer already holds a confirmed or pending booking.
    Booked,
    /// Full, but new waiting entries are accepted.
    Waitlist,
    /// The booking window has passed; capacity is irrelevant.
    Closed,
}

/// Everything the availability decision needs, resolved by the caller.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityInput {
    pub now: Timestamp,
    pub start_time: Timestamp,
    pub lockout_minutes: i32,
    pub remaining_capacity: i32,
    /// Whether the viewer holds a confirmed or pending booking on this
    /// lesson. `false` for anonymous viewers.
    pub viewer_holds_place: bool,
}

/// Derive the viewer-facing availability, evaluated in priority order:
/// own booking, then lockout window, then capacity.
pub fn availability_for(input: AvailabilityInput) -> Availability {
    if input.viewer_holds_place {
        return Availability::Booked;
    }
    if window_closed(input.now, input.start_time, input.lockout_minutes) {
        return Availability::Closed;
    }
    if input.remaining_capacity <= 0 {
        return Availability::Waitlist;
    }
    Availability::Open
}
