use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studiobook_core::eligibility::{SubscriptionFacts, SubscriptionStatus};
use studiobook_core::types::{DbId, Timestamp};

/// A row from the `subscriptions` table.
///
/// Written by the external payment collaborator; the engine only reads.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub tenant_id: DbId,
    pub user_id: DbId,
    pub plan_id: DbId,
    pub status: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Project the row onto the facts the eligibility decision needs.
    ///
    /// Unknown status text (a new provider state we do not model yet) is
    /// treated as `unpaid`, which blocks new bookings without touching
    /// existing ones.
    pub fn facts(&self) -> SubscriptionFacts {
        SubscriptionFacts {
            plan_id: self.plan_id,
            status: SubscriptionStatus::parse(&self.status)
                .unwrap_or(SubscriptionStatus::Unpaid),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// DTO for recording a subscription (used by tests and sync tooling;
/// production rows arrive from the payment system).
#[derive(Debug, Deserialize)]
pub struct CreateSubscription {
    pub user_id: DbId,
    pub plan_id: DbId,
    pub status: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}
