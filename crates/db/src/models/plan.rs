use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studiobook_core::types::{DbId, Timestamp};

/// A row from the `plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plan {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub plan_type: String,
    /// Delegated seats a child/family plan covers on one lesson.
    /// `None` means unlimited.
    pub quantity: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a plan.
#[derive(Debug, Deserialize)]
pub struct CreatePlan {
    pub name: String,
    pub plan_type: String,
    #[serde(default)]
    pub quantity: Option<i32>,
}
