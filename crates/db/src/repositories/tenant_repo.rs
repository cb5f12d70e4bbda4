//! Repository for the `tenants` table. Provisioning is external; this
//! exists for fixtures and the occasional admin lookup.

use sqlx::PgPool;
use studiobook_core::types::DbId;

use crate::models::tenant::Tenant;

const COLUMNS: &str = "id, name, created_at";

pub struct TenantRepo;

impl TenantRepo {
    /// Create a tenant.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Tenant, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (name) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a tenant by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
