//! Repository for the `plans` table.

use sqlx::PgPool;
use studiobook_core::types::DbId;

use crate::models::plan::{CreatePlan, Plan};

/// Column list for `plans` queries.
const COLUMNS: &str = "\
    id, tenant_id, name, plan_type, quantity, created_at, updated_at";

/// CRUD for plans.
pub struct PlanRepo;

impl PlanRepo {
    /// Create a plan.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreatePlan,
    ) -> Result<Plan, sqlx::Error> {
        let query = format!(
            "INSERT INTO plans (tenant_id, name, plan_type, quantity) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plan>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.plan_type)
            .bind(input.quantity)
            .fetch_one(pool)
            .await
    }

    /// Find a plan by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plans WHERE id = $1 AND tenant_id = $2");
        sqlx::query_as::<_, Plan>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }
}
