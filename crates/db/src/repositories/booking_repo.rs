//! Repository for the `bookings` table.
//!
//! Owns the capacity-safe insert: the confirmed-seat check and the
//! insert happen inside one transaction under a row lock on the lesson,
//! so two concurrent requests can never both take the last seat.

use sqlx::PgPool;
use studiobook_core::booking::BookingStatus;
use studiobook_core::types::DbId;

use crate::models::booking::{Booking, ConfirmOutcome, InsertOutcome};

/// Column list for `bookings` queries.
const COLUMNS: &str = "\
    id, tenant_id, lesson_id, user_id, status, created_at, updated_at";

/// Provides CRUD and the capacity-safe insert for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Atomically check remaining capacity and insert a confirmed
    /// booking.
    ///
    /// Takes `SELECT ... FOR UPDATE` on the lesson row, recounts
    /// confirmed bookings under the lock, and inserts only when a seat
    /// remains. A verifying recount runs before commit; if it ever
    /// exceeds `places` the transaction is rolled back and the breach is
    /// reported so the caller can surface it to operators.
    pub async fn insert_confirmed_guarded(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
        user_id: DbId,
    ) -> Result<InsertOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let places: Option<i32> = sqlx::query_scalar(
            "SELECT places FROM lessons \
             WHERE id = $1 AND tenant_id = $2 \
             FOR UPDATE",
        )
        .bind(lesson_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(places) = places else {
            tx.rollback().await?;
            return Ok(InsertOutcome::LessonMissing);
        };

        let confirmed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE lesson_id = $1 AND status = $2",
        )
        .bind(lesson_id)
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if confirmed >= i64::from(places) {
            tx.rollback().await?;
            return Ok(InsertOutcome::Full);
        }

        let query = format!(
            "INSERT INTO bookings (tenant_id, lesson_id, user_id, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .bind(user_id)
            .bind(BookingStatus::Confirmed.as_str())
            .fetch_one(&mut *tx)
            .await?;

        // Post-condition check. Under the row lock this cannot trip; it
        // exists to catch a storage layer that stopped honoring the lock.
        let after: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE lesson_id = $1 AND status = $2",
        )
        .bind(lesson_id)
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if after > i64::from(places) {
            tx.rollback().await?;
            return Ok(InsertOutcome::InvariantBreach {
                places,
                confirmed: after,
            });
        }

        tx.commit().await?;
        Ok(InsertOutcome::Confirmed(booking))
    }

    /// Atomically flip an existing booking to confirmed, re-checking
    /// capacity under the lesson row lock.
    ///
    /// Used when a waiting (or pending) booking is confirmed — e.g. a
    /// user accepting a waitlist promotion. Same locking discipline as
    /// [`Self::insert_confirmed_guarded`]; the freed seat may already be
    /// gone by the time the user responds. The booking row is locked
    /// too, and its status is re-read inside the transaction: a cancel
    /// that committed after the caller's read surfaces as
    /// [`ConfirmOutcome::TransitionBlocked`], never a resurrection.
    pub async fn confirm_guarded(
        pool: &PgPool,
        tenant_id: DbId,
        booking_id: DbId,
    ) -> Result<ConfirmOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId, i32, String)> = sqlx::query_as(
            "SELECT l.id, l.places, b.status FROM lessons l \
             JOIN bookings b ON b.lesson_id = l.id \
             WHERE b.id = $1 AND b.tenant_id = $2 \
             FOR UPDATE",
        )
        .bind(booking_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((lesson_id, places, status)) = row else {
            tx.rollback().await?;
            return Ok(ConfirmOutcome::Missing);
        };

        // Only waiting and pending bookings may be confirmed. Cancelled
        // is terminal; a confirmed booking has nothing to do.
        if !matches!(
            BookingStatus::parse(&status),
            Some(BookingStatus::Waiting | BookingStatus::Pending)
        ) {
            tx.rollback().await?;
            return Ok(ConfirmOutcome::TransitionBlocked { status });
        }

        let confirmed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE lesson_id = $1 AND status = $2",
        )
        .bind(lesson_id)
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if confirmed >= i64::from(places) {
            tx.rollback().await?;
            return Ok(ConfirmOutcome::Full);
        }

        let query = format!(
            "UPDATE bookings \
             SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND tenant_id = $2 AND status IN ($4, $5) \
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .bind(tenant_id)
            .bind(BookingStatus::Confirmed.as_str())
            .bind(BookingStatus::Waiting.as_str())
            .bind(BookingStatus::Pending.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        // The row lock makes a status change between the read above and
        // this update impossible; the predicate backstops it regardless.
        let Some(booking) = booking else {
            tx.rollback().await?;
            return Ok(ConfirmOutcome::TransitionBlocked { status });
        };

        tx.commit().await?;
        Ok(ConfirmOutcome::Confirmed(booking))
    }

    /// Insert a booking that does not occupy a seat (`waiting` or
    /// `pending`). Must not be used with `Confirmed` — that path goes
    /// through [`Self::insert_confirmed_guarded`].
    pub async fn insert_unguarded(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
        user_id: DbId,
        status: BookingStatus,
    ) -> Result<Booking, sqlx::Error> {
        debug_assert!(status != BookingStatus::Confirmed);
        let query = format!(
            "INSERT INTO bookings (tenant_id, lesson_id, user_id, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a booking by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE id = $1 AND tenant_id = $2"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// The viewer's live (non-cancelled) booking on a lesson, if any.
    pub async fn find_live_for_user(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE tenant_id = $1 AND lesson_id = $2 AND user_id = $3 \
               AND status <> $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .bind(user_id)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Count confirmed bookings for a lesson.
    pub async fn count_confirmed(pool: &PgPool, lesson_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE lesson_id = $1 AND status = $2",
        )
        .bind(lesson_id)
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(pool)
        .await
    }

    /// Count confirmed bookings on a lesson made for children of one
    /// parent (plan-quantity enforcement for child/family plans).
    pub async fn count_confirmed_delegated(
        pool: &PgPool,
        lesson_id: DbId,
        parent_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings b \
             JOIN users u ON u.id = b.user_id \
             WHERE b.lesson_id = $1 AND b.status = $2 AND u.parent_id = $3",
        )
        .bind(lesson_id)
        .bind(BookingStatus::Confirmed.as_str())
        .bind(parent_id)
        .fetch_one(pool)
        .await
    }

    /// Waiting bookings for a lesson, oldest first (first-come-first-
    /// served promotion order), capped at `limit`.
    pub async fn list_waiting_oldest_first(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
        limit: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE tenant_id = $1 AND lesson_id = $2 AND status = $3 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .bind(BookingStatus::Waiting.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a booking's status. The caller validates the transition
    /// against the state machine first.
    pub async fn set_status(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings \
             SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND tenant_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// All bookings for a lesson, newest first.
    pub async fn list_for_lesson(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE tenant_id = $1 AND lesson_id = $2 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .fetch_all(pool)
            .await
    }
}
