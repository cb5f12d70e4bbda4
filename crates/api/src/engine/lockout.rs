//! Lockout window reconciliation.
//!
//! Runs after any booking write for a lesson. Recomputes the desired
//! lockout from scratch and writes only on difference, so re-running it
//! is always safe and a lost run self-heals on the next booking write.

use sqlx::PgPool;
use studiobook_core::lockout::desired_lockout_minutes;
use studiobook_core::types::DbId;
use studiobook_db::repositories::{BookingRepo, LessonRepo};

/// What a reconciliation run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutOutcome {
    /// The effective window already matched the desired value.
    Unchanged,
    /// The effective window was rewritten.
    Updated { from: i32, to: i32 },
    /// The lesson no longer exists; nothing to reconcile.
    LessonMissing,
}

/// Reconcile a lesson's effective lockout window with its confirmed
/// bookings: any confirmed booking drops the window to zero, none
/// restores the configured value.
///
/// A missing lesson is a no-op, not an error — the lesson may have been
/// deleted between the triggering write and this run.
pub async fn reconcile_lockout(
    pool: &PgPool,
    tenant_id: DbId,
    lesson_id: DbId,
) -> Result<LockoutOutcome, sqlx::Error> {
    let Some(lesson) = LessonRepo::find_by_id(pool, tenant_id, lesson_id).await? else {
        tracing::debug!(lesson_id, "Lockout reconcile skipped: lesson gone");
        return Ok(LockoutOutcome::LessonMissing);
    };

    let confirmed = BookingRepo::count_confirmed(pool, lesson_id).await?;
    let desired = desired_lockout_minutes(confirmed, lesson.original_lockout_minutes);

    if lesson.lockout_minutes == desired {
        return Ok(LockoutOutcome::Unchanged);
    }

    // The lesson can disappear between the read and this write; that
    // still counts as reconciled.
    if !LessonRepo::set_lockout_minutes(pool, tenant_id, lesson_id, desired).await? {
        tracing::debug!(lesson_id, "Lockout reconcile skipped: lesson gone");
        return Ok(LockoutOutcome::LessonMissing);
    }

    tracing::info!(
        lesson_id,
        from = lesson.lockout_minutes,
        to = desired,
        confirmed,
        "Lockout window reconciled",
    );

    Ok(LockoutOutcome::Updated {
        from: lesson.lockout_minutes,
        to: desired,
    })
}
