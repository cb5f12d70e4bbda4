//! Waitlist promotion.
//!
//! Runs after a confirmed booking is cancelled. Recomputes remaining
//! capacity and raises a promotion signal for the oldest waiting
//! bookings, up to the number of freed seats. It never flips a booking
//! to confirmed itself: promotion requires the user to re-confirm, so
//! nobody is silently committed to a slot they may no longer want.

use sqlx::PgPool;
use studiobook_core::capacity::{raw_remaining, remaining_capacity};
use studiobook_core::types::DbId;
use studiobook_db::repositories::{BookingRepo, LessonRepo};
use studiobook_events::{BookingEvent, EventBus};

/// Signal oldest-first waiting bookings that seats are available.
///
/// Returns the number of promotion signals published. A missing lesson
/// is a no-op.
pub async fn promote_waitlist(
    pool: &PgPool,
    bus: &EventBus,
    tenant_id: DbId,
    lesson_id: DbId,
) -> Result<usize, sqlx::Error> {
    let Some(lesson) = LessonRepo::find_by_id(pool, tenant_id, lesson_id).await? else {
        tracing::debug!(lesson_id, "Waitlist promotion skipped: lesson gone");
        return Ok(0);
    };

    let confirmed = BookingRepo::count_confirmed(pool, lesson_id).await?;
    if raw_remaining(lesson.places, confirmed) < 0 {
        tracing::error!(
            lesson_id,
            places = lesson.places,
            confirmed,
            "Confirmed bookings exceed lesson capacity",
        );
    }

    let freed = remaining_capacity(lesson.places, confirmed);
    if freed <= 0 {
        return Ok(0);
    }

    let waiting =
        BookingRepo::list_waiting_oldest_first(pool, tenant_id, lesson_id, i64::from(freed))
            .await?;

    for booking in &waiting {
        bus.publish(
            BookingEvent::new("waitlist.seat_available", tenant_id, lesson_id)
                .with_booking(booking.id)
                .with_user(booking.user_id),
        );
    }

    if !waiting.is_empty() {
        tracing::info!(
            lesson_id,
            signals = waiting.len(),
            freed,
            "Waitlist promotion signals published",
        );
    }

    Ok(waiting.len())
}
