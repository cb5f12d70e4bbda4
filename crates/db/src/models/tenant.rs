use serde::Serialize;
use sqlx::FromRow;
use studiobook_core::types::{DbId, Timestamp};

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
