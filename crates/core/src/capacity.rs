//! Capacity accounting for a lesson.
//!
//! Capacity is a projection over current state (`places` minus confirmed
//! bookings), recomputed on every read and never persisted.

/// Remaining seats on a lesson, clamped at zero.
///
/// A raw value below zero means the capacity invariant was already
/// violated by an earlier write; callers that can log should check
/// [`raw_remaining`] separately and report the fault instead of hiding
/// it behind the clamp.
pub fn remaining_capacity(places: i32, confirmed_count: i64) -> i32 {
    raw_remaining(places, confirmed_count).max(0)
}

/// Unclamped remaining seats. Negative values indicate an invariant
/// violation in storage.
pub fn raw_remaining(places: i32, confirmed_count: i64) -> i32 {
    let confirmed = i32::try_from(confirmed_count).unwrap_or(i32::MAX);
    places.saturating_sub(confirmed)
}
