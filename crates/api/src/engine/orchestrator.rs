//! The booking orchestrator: the entry point composing availability,
//! eligibility, the capacity-safe insert, and post-commit reconciliation.
//!
//! Success paths block on exactly one storage round trip for the write;
//! lockout and waitlist reconciliation run in a spawned task after the
//! write commits and never fail the caller's request.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use studiobook_core::booking::{validate_transition, BookingStatus};
use studiobook_core::error::BookingError;
use studiobook_core::lockout::window_closed;
use studiobook_core::types::DbId;
use studiobook_db::models::booking::{Booking, ConfirmOutcome, InsertOutcome};
use studiobook_db::repositories::{BookingRepo, ClassOptionRepo, LessonRepo, UserRepo};
use studiobook_events::{BookingEvent, EventBus};

use crate::engine::{eligibility, lockout, waitlist};
use crate::error::{AppError, AppResult};

/// A validated booking request, assembled by the handler from the
/// request body and the caller's identity.
#[derive(Debug)]
pub struct CreateBookingRequest {
    pub lesson_id: DbId,
    /// The user the booking is for (the caller, or someone else when a
    /// staff member registers a walk-in).
    pub user_id: DbId,
    /// `confirmed` to take a seat, `waiting` to join the waitlist,
    /// `pending` to hold a place awaiting confirmation.
    pub desired: BookingStatus,
    /// Fall back to a waiting entry when the class turns out to be full.
    pub accept_waiting: bool,
    /// Staff bypass the lockout window (walk-ins for a running class),
    /// never the capacity invariant.
    pub staff_override: bool,
}

/// Create a booking.
///
/// Failure modes are the typed outcomes of the domain: `LessonNotFound`,
/// `BookingWindowClosed`, `NotEligible`, `ClassFull`, plus `Conflict`
/// when the user already holds a live booking on the lesson.
pub async fn create_booking(
    pool: &PgPool,
    bus: &Arc<EventBus>,
    tenant_id: DbId,
    request: CreateBookingRequest,
) -> AppResult<Booking> {
    if request.desired == BookingStatus::Cancelled {
        return Err(AppError::BadRequest(
            "Cannot create a booking in cancelled status".into(),
        ));
    }

    let lesson = LessonRepo::find_by_id(pool, tenant_id, request.lesson_id)
        .await?
        .ok_or(BookingError::LessonNotFound {
            id: request.lesson_id,
        })?;

    // One live booking per user per lesson. The partial unique index
    // backstops this under concurrency; checking here gives a clean
    // message on the common path.
    if BookingRepo::find_live_for_user(pool, tenant_id, lesson.id, request.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User already has a booking on this lesson".into(),
        ));
    }

    let closed = window_closed(Utc::now(), lesson.start_time, lesson.lockout_minutes);
    if closed && !request.staff_override {
        return Err(BookingError::BookingWindowClosed.into());
    }

    // Seat-taking requests are payment-gated; waitlist entries are not —
    // eligibility is re-checked when the user confirms a promotion.
    if request.desired != BookingStatus::Waiting {
        check_eligibility(pool, tenant_id, lesson.class_option_id, &request, lesson.id).await?;
    }

    let booking = match request.desired {
        BookingStatus::Confirmed => {
            match BookingRepo::insert_confirmed_guarded(pool, tenant_id, lesson.id, request.user_id)
                .await?
            {
                InsertOutcome::Confirmed(booking) => booking,
                InsertOutcome::Full if request.accept_waiting => {
                    BookingRepo::insert_unguarded(
                        pool,
                        tenant_id,
                        lesson.id,
                        request.user_id,
                        BookingStatus::Waiting,
                    )
                    .await?
                }
                InsertOutcome::Full => return Err(BookingError::ClassFull.into()),
                InsertOutcome::LessonMissing => {
                    return Err(BookingError::LessonNotFound { id: lesson.id }.into())
                }
                InsertOutcome::InvariantBreach { places, confirmed } => {
                    return Err(invariant_breach(lesson.id, places, confirmed));
                }
            }
        }
        // Waiting and pending entries take no seat; no capacity guard.
        _ => {
            BookingRepo::insert_unguarded(
                pool,
                tenant_id,
                lesson.id,
                request.user_id,
                request.desired,
            )
            .await?
        }
    };

    publish_lifecycle(bus, tenant_id, &booking);
    spawn_reconciliation(pool.clone(), Arc::clone(bus), tenant_id, lesson.id, false);

    tracing::info!(
        booking_id = booking.id,
        lesson_id = lesson.id,
        user_id = booking.user_id,
        status = %booking.status,
        "Booking created",
    );

    Ok(booking)
}

/// Cancel a booking.
///
/// The cancelled row is retained. Lockout reconciliation always follows;
/// waitlist promotion follows only when a confirmed seat was freed.
pub async fn cancel_booking(
    pool: &PgPool,
    bus: &Arc<EventBus>,
    tenant_id: DbId,
    booking_id: DbId,
) -> AppResult<Booking> {
    let booking = BookingRepo::find_by_id(pool, tenant_id, booking_id)
        .await?
        .ok_or(BookingError::BookingNotFound { id: booking_id })?;

    let from = booking.status();
    validate_transition(from, BookingStatus::Cancelled)?;

    let cancelled = BookingRepo::set_status(pool, tenant_id, booking_id, BookingStatus::Cancelled)
        .await?
        .ok_or(BookingError::BookingNotFound { id: booking_id })?;

    bus.publish(
        BookingEvent::new("booking.cancelled", tenant_id, cancelled.lesson_id)
            .with_booking(cancelled.id)
            .with_user(cancelled.user_id),
    );

    let freed_seat = from == BookingStatus::Confirmed;
    spawn_reconciliation(
        pool.clone(),
        Arc::clone(bus),
        tenant_id,
        cancelled.lesson_id,
        freed_seat,
    );

    tracing::info!(
        booking_id = cancelled.id,
        lesson_id = cancelled.lesson_id,
        was_confirmed = freed_seat,
        "Booking cancelled",
    );

    Ok(cancelled)
}

/// Confirm an existing waiting or pending booking — e.g. a user
/// accepting a waitlist promotion. Re-checks capacity under the lesson
/// row lock; the freed seat may already be gone.
pub async fn confirm_booking(
    pool: &PgPool,
    bus: &Arc<EventBus>,
    tenant_id: DbId,
    booking_id: DbId,
    staff_override: bool,
) -> AppResult<Booking> {
    let booking = BookingRepo::find_by_id(pool, tenant_id, booking_id)
        .await?
        .ok_or(BookingError::BookingNotFound { id: booking_id })?;

    validate_transition(booking.status(), BookingStatus::Confirmed)?;

    let lesson = LessonRepo::find_by_id(pool, tenant_id, booking.lesson_id)
        .await?
        .ok_or(BookingError::LessonNotFound {
            id: booking.lesson_id,
        })?;

    if window_closed(Utc::now(), lesson.start_time, lesson.lockout_minutes) && !staff_override {
        return Err(BookingError::BookingWindowClosed.into());
    }

    let confirmed = match BookingRepo::confirm_guarded(pool, tenant_id, booking_id).await? {
        ConfirmOutcome::Confirmed(booking) => booking,
        ConfirmOutcome::Full => return Err(BookingError::ClassFull.into()),
        ConfirmOutcome::Missing => {
            return Err(BookingError::BookingNotFound { id: booking_id }.into())
        }
        // The status changed under us, e.g. a cancel landed between our
        // read above and the locked re-read.
        ConfirmOutcome::TransitionBlocked { status } => {
            let from = BookingStatus::parse(&status).unwrap_or(BookingStatus::Cancelled);
            return Err(BookingError::InvalidTransition {
                from,
                to: BookingStatus::Confirmed,
            }
            .into());
        }
    };

    publish_lifecycle(bus, tenant_id, &confirmed);
    spawn_reconciliation(pool.clone(), Arc::clone(bus), tenant_id, lesson.id, false);

    tracing::info!(
        booking_id = confirmed.id,
        lesson_id = lesson.id,
        "Booking confirmed",
    );

    Ok(confirmed)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the target user and class option and run the eligibility checks.
async fn check_eligibility(
    pool: &PgPool,
    tenant_id: DbId,
    class_option_id: DbId,
    request: &CreateBookingRequest,
    lesson_id: DbId,
) -> AppResult<()> {
    let user = UserRepo::find_by_id(pool, tenant_id, request.user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown user {}", request.user_id)))?;

    let class_option = ClassOptionRepo::find_by_id(pool, tenant_id, class_option_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Lesson references missing class option {class_option_id}"))
        })?;

    let resolved = eligibility::resolve(pool, tenant_id, &user, &class_option).await?;
    if !resolved.eligible {
        return Err(
            BookingError::NotEligible("No active subscription to an allowed plan".into()).into(),
        );
    }

    if let Some(parent_id) = user.parent_id {
        eligibility::check_delegated_quota(pool, tenant_id, lesson_id, parent_id, &class_option)
            .await?;
    }

    Ok(())
}

/// Publish the lifecycle event matching a booking's status.
fn publish_lifecycle(bus: &EventBus, tenant_id: DbId, booking: &Booking) {
    let event_type = match booking.status() {
        BookingStatus::Confirmed => "booking.confirmed",
        BookingStatus::Waiting => "booking.waiting",
        BookingStatus::Pending => "booking.pending",
        BookingStatus::Cancelled => "booking.cancelled",
    };
    bus.publish(
        BookingEvent::new(event_type, tenant_id, booking.lesson_id)
            .with_booking(booking.id)
            .with_user(booking.user_id),
    );
}

/// Map a post-condition breach to the fatal error, with the operator log
/// the taxonomy requires.
fn invariant_breach(lesson_id: DbId, places: i32, confirmed: i64) -> AppError {
    tracing::error!(
        lesson_id,
        places,
        confirmed,
        "Capacity invariant breached during guarded insert; transaction rolled back",
    );
    BookingError::InvariantViolation(format!(
        "lesson {lesson_id}: {confirmed} confirmed bookings for {places} places"
    ))
    .into()
}

/// Run post-commit reconciliation off the request path. Failures are
/// logged and self-heal on the next booking write for the lesson.
fn spawn_reconciliation(
    pool: PgPool,
    bus: Arc<EventBus>,
    tenant_id: DbId,
    lesson_id: DbId,
    freed_seat: bool,
) {
    tokio::spawn(async move {
        if let Err(err) = lockout::reconcile_lockout(&pool, tenant_id, lesson_id).await {
            tracing::error!(
                lesson_id,
                error = %err,
                "Lockout reconcile failed; next booking write will retry",
            );
        }
        if freed_seat {
            if let Err(err) = waitlist::promote_waitlist(&pool, &bus, tenant_id, lesson_id).await {
                tracing::error!(
                    lesson_id,
                    error = %err,
                    "Waitlist promotion failed; next cancellation will retry",
                );
            }
        }
    });
}
