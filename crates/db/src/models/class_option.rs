use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studiobook_core::types::{DbId, Timestamp};

/// A row from the `class_options` table.
///
/// `places` is inherited into each generated lesson at creation time;
/// lessons copy capacity, they do not reference it live. Allowed plans
/// live in the `class_option_plans` join table and are loaded with
/// [`ClassOptionRepo::allowed_plan_ids`](crate::repositories::ClassOptionRepo::allowed_plan_ids).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassOption {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub option_type: String,
    pub places: i32,
    pub drop_in_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Class option audience types.
pub const OPTION_TYPE_ADULT: &str = "adult";
pub const OPTION_TYPE_CHILD: &str = "child";
pub const OPTION_TYPE_FAMILY: &str = "family";

/// DTO for creating a class option.
#[derive(Debug, Deserialize)]
pub struct CreateClassOption {
    pub name: String,
    pub option_type: String,
    pub places: i32,
    #[serde(default)]
    pub drop_in_id: Option<DbId>,
}
