//! Repository for the `users` table.

use sqlx::PgPool;
use studiobook_core::types::DbId;

use crate::models::user::{CreateUser, User, ROLE_MEMBER};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, tenant_id, name, email, role, parent_id, created_at, updated_at";

/// CRUD for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user. Role defaults to `member`.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (tenant_id, name, email, role, parent_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.role.as_deref().unwrap_or(ROLE_MEMBER))
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND tenant_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }
}
