use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studiobook_core::types::{DbId, Timestamp};

/// A row from the `lessons` table.
///
/// `lockout_minutes` is the effective cutoff and is owned exclusively by
/// the lockout reconciler; `original_lockout_minutes` is the configured
/// cutoff it restores when no confirmed bookings remain. Remaining
/// capacity and per-viewer availability are computed, never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub tenant_id: DbId,
    pub class_option_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub places: i32,
    pub lockout_minutes: i32,
    pub original_lockout_minutes: i32,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lesson (scheduling tooling and tests).
///
/// `places` defaults to the class option's value when `None`, mirroring
/// capacity inheritance at generation time. When `original_lockout_minutes`
/// is not given it is seeded from `lockout_minutes`.
#[derive(Debug, Deserialize)]
pub struct CreateLesson {
    pub class_option_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[serde(default)]
    pub places: Option<i32>,
    pub lockout_minutes: i32,
    #[serde(default)]
    pub original_lockout_minutes: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
}
