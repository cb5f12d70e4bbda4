use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studiobook_core::types::{DbId, Timestamp};

/// Role for the `member`/`staff` split. Staff may book walk-ins on
/// behalf of other users past the lockout window.
pub const ROLE_MEMBER: &str = "member";
pub const ROLE_STAFF: &str = "staff";

/// A row from the `users` table.
///
/// `parent_id` marks a child account that delegates eligibility checks
/// to its parent's subscriptions. The relation is one level only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parent_id: Option<DbId>,
}
