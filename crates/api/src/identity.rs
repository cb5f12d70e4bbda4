//! Caller identity extractor.
//!
//! Authentication itself is an upstream gateway concern; by the time a
//! request reaches this service the gateway has verified the session and
//! injected the caller's identity as headers. The extractor only parses
//! and validates presence — it never checks credentials.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use studiobook_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Gateway header carrying the caller's user id.
const HEADER_USER_ID: &str = "x-user-id";
/// Gateway header carrying the caller's tenant id.
const HEADER_TENANT_ID: &str = "x-tenant-id";
/// Gateway header carrying the caller's role (`member` or `staff`).
const HEADER_ROLE: &str = "x-user-role";

/// Staff role name as injected by the gateway.
pub const ROLE_STAFF: &str = "staff";

/// Caller identity extracted from gateway-injected headers.
///
/// Use as an extractor parameter in any handler that requires a caller:
///
/// ```ignore
/// async fn my_handler(identity: Identity) -> AppResult<Json<()>> {
///     tracing::info!(user_id = identity.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    /// The caller's internal database id.
    pub user_id: DbId,
    /// The tenant every read and write in this request is scoped to.
    pub tenant_id: DbId,
    /// The caller's role (`member` or `staff`).
    pub role: String,
}

impl Identity {
    /// Whether the caller is staff (may act on behalf of other users
    /// and register walk-ins past the lockout window).
    pub fn is_staff(&self) -> bool {
        self.role == ROLE_STAFF
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = required_id_header(parts, HEADER_USER_ID)?;
        let tenant_id = required_id_header(parts, HEADER_TENANT_ID)?;

        let role = parts
            .headers
            .get(HEADER_ROLE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("member")
            .to_string();

        Ok(Identity {
            user_id,
            tenant_id,
            role,
        })
    }
}

/// Parse a required numeric id header, rejecting missing or malformed
/// values.
fn required_id_header(parts: &Parts, name: &'static str) -> Result<DbId, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {name} header")))?
        .parse()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {name} header")))
}
