//! Lockout window decisions.
//!
//! The lockout window is the number of minutes before a lesson's start
//! after which new bookings are refused. Once at least one person has
//! committed to a class, staff should be able to register walk-ins up to
//! the literal start time, so the effective window drops to zero. When
//! the last confirmed attendee cancels, the configured window is
//! restored so the system stops accepting new commitments to a class
//! that may not run.
//!
//! The decision here is pure; `engine::lockout` in the API crate applies
//! it as an idempotent reconciliation step after booking writes.

use chrono::Duration;

use crate::types::Timestamp;

/// The lockout value a lesson should carry given its confirmed-booking
/// count and its configured (original) window.
pub fn desired_lockout_minutes(confirmed_count: i64, original_minutes: i32) -> i32 {
    if confirmed_count > 0 {
        0
    } else {
        original_minutes
    }
}

/// The instant at which booking closes for a lesson.
pub fn booking_deadline(start_time: Timestamp, lockout_minutes: i32) -> Timestamp {
    start_time - Duration::minutes(i64::from(lockout_minutes))
}

/// Whether the booking window has passed (closed regardless of capacity).
pub fn window_closed(now: Timestamp, start_time: Timestamp, lockout_minutes: i32) -> bool {
    now >= booking_deadline(start_time, lockout_minutes)
}
