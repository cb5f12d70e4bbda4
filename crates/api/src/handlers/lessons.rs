//! Handlers for the `/lessons` resource.
//!
//! Lesson reads carry two computed fields the storage layer never holds:
//! `remaining_capacity` and the viewer's `booking_status`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use studiobook_core::availability::{availability_for, Availability, AvailabilityInput};
use studiobook_core::booking::holds_place;
use studiobook_core::capacity::remaining_capacity;
use studiobook_core::error::BookingError;
use studiobook_core::types::{DbId, Timestamp};
use studiobook_db::models::lesson::{CreateLesson, Lesson};
use studiobook_db::repositories::{BookingRepo, ClassOptionRepo, LessonRepo, UserRepo};

use crate::engine::eligibility;
use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

/// Days of schedule returned when the caller gives no `to` bound.
const DEFAULT_SCHEDULE_DAYS: i64 = 7;

/// A lesson enriched with the viewer-facing computed fields.
#[derive(Debug, Serialize)]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub remaining_capacity: i32,
    pub booking_status: Availability,
}

/// Time range for schedule listing.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default)]
    pub from: Option<Timestamp>,
    #[serde(default)]
    pub to: Option<Timestamp>,
}

/// GET /api/v1/lessons/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LessonView>>> {
    let lesson = LessonRepo::find_by_id(&state.pool, identity.tenant_id, id)
        .await?
        .ok_or(BookingError::LessonNotFound { id })?;
    let view = enrich(&state, &identity, lesson).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/lessons?from=..&to=..
///
/// Active lessons for the tenant, each with the viewer's computed
/// fields. Defaults to the next seven days.
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<DataResponse<Vec<LessonView>>>> {
    let from = query.from.unwrap_or_else(Utc::now);
    let to = query
        .to
        .unwrap_or_else(|| from + Duration::days(DEFAULT_SCHEDULE_DAYS));
    if to <= from {
        return Err(AppError::BadRequest("`to` must be after `from`".into()));
    }

    let lessons = LessonRepo::list_between(&state.pool, identity.tenant_id, from, to).await?;

    let mut views = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        views.push(enrich(&state, &identity, lesson).await?);
    }
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/lessons — staff scheduling.
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<CreateLesson>,
) -> AppResult<(StatusCode, Json<DataResponse<Lesson>>)> {
    if !identity.is_staff() {
        return Err(AppError::Forbidden("Staff only".into()));
    }
    if input.end_time <= input.start_time {
        return Err(AppError::BadRequest(
            "end_time must be after start_time".into(),
        ));
    }
    if input.lockout_minutes < 0 || input.original_lockout_minutes.is_some_and(|m| m < 0) {
        return Err(AppError::BadRequest(
            "Lockout minutes must be non-negative".into(),
        ));
    }

    let lesson = LessonRepo::create(&state.pool, identity.tenant_id, &input)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => AppError::BadRequest(format!(
                "Unknown class option {}",
                input.class_option_id
            )),
            other => AppError::Database(other),
        })?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// DELETE /api/v1/lessons/{id} — staff scheduling. Cascades to bookings.
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !identity.is_staff() {
        return Err(AppError::Forbidden("Staff only".into()));
    }
    if LessonRepo::delete(&state.pool, identity.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(BookingError::LessonNotFound { id }.into())
    }
}

/// Eligibility answer for the viewer on one lesson.
#[derive(Debug, Serialize)]
pub struct EligibilityView {
    pub lesson_id: DbId,
    pub user_id: DbId,
    pub is_eligible: bool,
}

/// GET /api/v1/lessons/{id}/eligibility
///
/// Whether the viewer may book this lesson under the plan gate. Window
/// and capacity are not consulted; those are the availability fields.
pub async fn viewer_eligibility(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EligibilityView>>> {
    let lesson = LessonRepo::find_by_id(&state.pool, identity.tenant_id, id)
        .await?
        .ok_or(BookingError::LessonNotFound { id })?;

    let user = UserRepo::find_by_id(&state.pool, identity.tenant_id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown caller".into()))?;
    let class_option =
        ClassOptionRepo::find_by_id(&state.pool, identity.tenant_id, lesson.class_option_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Lesson references missing class option {}",
                    lesson.class_option_id
                ))
            })?;

    let resolved =
        eligibility::resolve(&state.pool, identity.tenant_id, &user, &class_option).await?;

    Ok(Json(DataResponse {
        data: EligibilityView {
            lesson_id: lesson.id,
            user_id: identity.user_id,
            is_eligible: resolved.eligible,
        },
    }))
}

/// Attach the computed per-viewer fields to a lesson row.
async fn enrich(state: &AppState, identity: &Identity, lesson: Lesson) -> AppResult<LessonView> {
    let confirmed = BookingRepo::count_confirmed(&state.pool, lesson.id).await?;
    let remaining = remaining_capacity(lesson.places, confirmed);

    let viewer_holds_place =
        BookingRepo::find_live_for_user(&state.pool, identity.tenant_id, lesson.id, identity.user_id)
            .await?
            .is_some_and(|b| holds_place(b.status()));

    let booking_status = availability_for(AvailabilityInput {
        now: Utc::now(),
        start_time: lesson.start_time,
        lockout_minutes: lesson.lockout_minutes,
        remaining_capacity: remaining,
        viewer_holds_place,
    });

    Ok(LessonView {
        lesson,
        remaining_capacity: remaining,
        booking_status,
    })
}
