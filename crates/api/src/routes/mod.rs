pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// GET    /lessons                      tenant schedule with computed fields
/// POST   /lessons                      create (staff)
/// GET    /lessons/{id}                 lesson with computed fields
/// DELETE /lessons/{id}                 delete (staff)
/// GET    /lessons/{id}/eligibility     viewer plan-gate answer
/// GET    /lessons/{id}/bookings        roster (staff)
///
/// POST   /bookings                     create (confirmed or waiting)
/// GET    /bookings/{id}                owner or staff
/// POST   /bookings/{id}/cancel         owner or staff
/// POST   /bookings/{id}/confirm        accept promotion (owner or staff)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/lessons",
            get(handlers::lessons::list).post(handlers::lessons::create),
        )
        .route(
            "/lessons/{id}",
            get(handlers::lessons::get_by_id).delete(handlers::lessons::delete),
        )
        .route(
            "/lessons/{id}/eligibility",
            get(handlers::lessons::viewer_eligibility),
        )
        .route(
            "/lessons/{lesson_id}/bookings",
            get(handlers::bookings::list_for_lesson),
        )
        .route("/bookings", post(handlers::bookings::create))
        .route("/bookings/{id}", get(handlers::bookings::get_by_id))
        .route("/bookings/{id}/cancel", post(handlers::bookings::cancel))
        .route("/bookings/{id}/confirm", post(handlers::bookings::confirm))
}
