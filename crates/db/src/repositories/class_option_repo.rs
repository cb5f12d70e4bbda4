//! Repository for the `class_options` table and its allowed-plans join.

use sqlx::PgPool;
use studiobook_core::types::DbId;

use crate::models::class_option::{ClassOption, CreateClassOption};

/// Column list for `class_options` queries.
const COLUMNS: &str = "\
    id, tenant_id, name, option_type, places, drop_in_id, \
    created_at, updated_at";

/// CRUD for class options.
pub struct ClassOptionRepo;

impl ClassOptionRepo {
    /// Create a class option.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateClassOption,
    ) -> Result<ClassOption, sqlx::Error> {
        let query = format!(
            "INSERT INTO class_options (tenant_id, name, option_type, places, drop_in_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassOption>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.option_type)
            .bind(input.places)
            .bind(input.drop_in_id)
            .fetch_one(pool)
            .await
    }

    /// Find a class option by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<ClassOption>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM class_options WHERE id = $1 AND tenant_id = $2"
        );
        sqlx::query_as::<_, ClassOption>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Plans whose subscribers may book this option. Empty means the
    /// option is open to all.
    pub async fn allowed_plan_ids(
        pool: &PgPool,
        class_option_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT plan_id FROM class_option_plans \
             WHERE class_option_id = $1 \
             ORDER BY plan_id",
        )
        .bind(class_option_id)
        .fetch_all(pool)
        .await
    }

    /// Add a plan to the option's allowed set.
    pub async fn allow_plan(
        pool: &PgPool,
        class_option_id: DbId,
        plan_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO class_option_plans (class_option_id, plan_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(class_option_id)
        .bind(plan_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
