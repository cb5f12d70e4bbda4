//! Repository for the `lessons` table.

use sqlx::PgPool;
use studiobook_core::types::{DbId, Timestamp};

use crate::models::lesson::{CreateLesson, Lesson};

/// Column list for `lessons` queries.
const COLUMNS: &str = "\
    id, tenant_id, class_option_id, start_time, end_time, places, \
    lockout_minutes, original_lockout_minutes, location, is_active, \
    created_at, updated_at";

/// CRUD for lessons plus the single lockout-field update used by the
/// reconciler.
pub struct LessonRepo;

impl LessonRepo {
    /// Create a lesson.
    ///
    /// When `places` is unset it is copied from the class option
    /// (capacity inheritance at generation time). When
    /// `original_lockout_minutes` is unset it is seeded from
    /// `lockout_minutes`.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateLesson,
    ) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons \
                 (tenant_id, class_option_id, start_time, end_time, places, \
                  lockout_minutes, original_lockout_minutes, location) \
             SELECT $1, co.id, $3, $4, COALESCE($5, co.places), $6, COALESCE($7, $6), $8 \
             FROM class_options co \
             WHERE co.id = $2 AND co.tenant_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(input.class_option_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.places)
            .bind(input.lockout_minutes)
            .bind(input.original_lockout_minutes)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Find a lesson by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE id = $1 AND tenant_id = $2"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Active lessons for the tenant's schedule between two instants.
    pub async fn list_between(
        pool: &PgPool,
        tenant_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE tenant_id = $1 AND is_active = TRUE \
               AND start_time >= $2 AND start_time < $3 \
             ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Write the effective lockout window. Only the lockout reconciler
    /// calls this. Returns `false` when the lesson no longer exists.
    pub async fn set_lockout_minutes(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        minutes: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lessons \
             SET lockout_minutes = $3, updated_at = NOW() \
             WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(minutes)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a lesson (cascades to its bookings). Used by scheduling
    /// tooling and tests; booking flows never delete lessons.
    pub async fn delete(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
