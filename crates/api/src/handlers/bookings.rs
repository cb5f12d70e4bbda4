//! Handlers for the `/bookings` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use studiobook_core::booking::BookingStatus;
use studiobook_core::error::BookingError;
use studiobook_core::types::DbId;
use studiobook_db::models::booking::{Booking, CreateBooking};
use studiobook_db::repositories::BookingRepo;

use crate::engine::orchestrator::{self, CreateBookingRequest};
use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/bookings
///
/// Members book for themselves; staff may book on behalf of another user
/// and past the lockout window (walk-ins).
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    let user_id = match input.user_id {
        Some(target) if target != identity.user_id => {
            if !identity.is_staff() {
                return Err(AppError::Forbidden(
                    "Only staff may book on behalf of another user".into(),
                ));
            }
            target
        }
        _ => identity.user_id,
    };

    let booking = orchestrator::create_booking(
        &state.pool,
        &state.event_bus,
        identity.tenant_id,
        CreateBookingRequest {
            lesson_id: input.lesson_id,
            user_id,
            desired: input.status,
            accept_waiting: input.join_waitlist_if_full,
            staff_override: identity.is_staff(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/v1/bookings/{id} — owner or staff.
pub async fn get_by_id(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, identity.tenant_id, id)
        .await?
        .ok_or(BookingError::BookingNotFound { id })?;
    authorize_on(&identity, &booking)?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/cancel — owner or staff.
pub async fn cancel(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, identity.tenant_id, id)
        .await?
        .ok_or(BookingError::BookingNotFound { id })?;
    authorize_on(&identity, &booking)?;

    let cancelled =
        orchestrator::cancel_booking(&state.pool, &state.event_bus, identity.tenant_id, id).await?;
    Ok(Json(DataResponse { data: cancelled }))
}

/// POST /api/v1/bookings/{id}/confirm — owner or staff.
///
/// Accepts a waitlist promotion (or confirms a pending hold). Capacity is
/// re-checked; the freed seat may already be gone.
pub async fn confirm(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, identity.tenant_id, id)
        .await?
        .ok_or(BookingError::BookingNotFound { id })?;
    authorize_on(&identity, &booking)?;

    // A promoted waiting booking re-enters the payment gate.
    if booking.status() == BookingStatus::Waiting {
        let lesson = studiobook_db::repositories::LessonRepo::find_by_id(
            &state.pool,
            identity.tenant_id,
            booking.lesson_id,
        )
        .await?
        .ok_or(BookingError::LessonNotFound {
            id: booking.lesson_id,
        })?;
        ensure_eligible(&state, identity.tenant_id, booking.user_id, &lesson).await?;
    }

    let confirmed = orchestrator::confirm_booking(
        &state.pool,
        &state.event_bus,
        identity.tenant_id,
        id,
        identity.is_staff(),
    )
    .await?;
    Ok(Json(DataResponse { data: confirmed }))
}

/// GET /api/v1/lessons/{lesson_id}/bookings — staff roster view.
pub async fn list_for_lesson(
    State(state): State<AppState>,
    identity: Identity,
    Path(lesson_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    if !identity.is_staff() {
        return Err(AppError::Forbidden("Staff only".into()));
    }
    let bookings = BookingRepo::list_for_lesson(&state.pool, identity.tenant_id, lesson_id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// Owner-or-staff check shared by the per-booking handlers.
fn authorize_on(identity: &Identity, booking: &Booking) -> AppResult<()> {
    if booking.user_id != identity.user_id && !identity.is_staff() {
        return Err(AppError::Forbidden(
            "Not your booking".into(),
        ));
    }
    Ok(())
}

/// Re-run the eligibility gate for a user confirming a promotion.
async fn ensure_eligible(
    state: &AppState,
    tenant_id: DbId,
    user_id: DbId,
    lesson: &studiobook_db::models::lesson::Lesson,
) -> AppResult<()> {
    use studiobook_db::repositories::{ClassOptionRepo, UserRepo};

    let user = UserRepo::find_by_id(&state.pool, tenant_id, user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown user {user_id}")))?;
    let class_option = ClassOptionRepo::find_by_id(&state.pool, tenant_id, lesson.class_option_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Lesson references missing class option {}",
                lesson.class_option_id
            ))
        })?;

    let resolved =
        crate::engine::eligibility::resolve(&state.pool, tenant_id, &user, &class_option).await?;
    if !resolved.eligible {
        return Err(
            BookingError::NotEligible("No active subscription to an allowed plan".into()).into(),
        );
    }
    Ok(())
}
