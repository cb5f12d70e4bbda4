//! Repository for the `subscriptions` table (read-mostly; the payment
//! system is the source of truth).

use sqlx::PgPool;
use studiobook_core::types::DbId;

use crate::models::subscription::{CreateSubscription, Subscription};

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "\
    id, tenant_id, user_id, plan_id, status, start_date, end_date, \
    created_at, updated_at";

/// Read access to subscription state, plus inserts for tests and sync
/// tooling.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Record a subscription row.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions \
                 (tenant_id, user_id, plan_id, status, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_id)
            .bind(input.user_id)
            .bind(input.plan_id)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// All subscription rows for a user. The eligibility decision in
    /// `studiobook_core` filters for activity; loading everything keeps
    /// the activity rule in exactly one place.
    pub async fn list_for_user(
        pool: &PgPool,
        tenant_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE tenant_id = $1 AND user_id = $2 \
             ORDER BY end_date DESC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
