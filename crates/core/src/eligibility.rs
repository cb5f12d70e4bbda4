//! Subscription/plan eligibility decisions.
//!
//! The decision is pure: the caller resolves the paying identity (the
//! user, or the parent for a child account — exactly one hop) and loads
//! that identity's subscriptions, then asks this module whether any of
//! them opens the class. Drop-in payment is always an alternative path
//! that bypasses subscription checks; the payment itself is handled by
//! an external collaborator.

use crate::types::{DbId, Timestamp};

/// Subscription lifecycle states as reported by the payment system.
///
/// `PastDue` and `Unpaid` block new bookings but do not retroactively
/// cancel existing confirmed ones (a UI concern, not ours).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Unpaid,
    Canceled,
}

impl SubscriptionStatus {
    /// Parse the stored text form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "unpaid" => Some(SubscriptionStatus::Unpaid),
            "canceled" => Some(SubscriptionStatus::Canceled),
            _ => None,
        }
    }
}

/// The facts about one subscription needed for an eligibility decision.
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionFacts {
    pub plan_id: DbId,
    pub status: SubscriptionStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

impl SubscriptionFacts {
    /// A subscription is active if its status is `active` and `now`
    /// falls within `[start_date, end_date)`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status == SubscriptionStatus::Active
            && self.start_date <= now
            && now < self.end_date
    }
}

/// Decide whether the paying identity may book a class option.
///
/// Eligible when any of:
/// - `allowed_plans` is empty (no restriction configured, open to all);
/// - a drop-in product is configured (payment handled externally);
/// - the paying identity holds an active subscription to an allowed plan.
pub fn is_eligible(
    now: Timestamp,
    allowed_plans: &[DbId],
    has_drop_in: bool,
    subscriptions: &[SubscriptionFacts],
) -> bool {
    if allowed_plans.is_empty() || has_drop_in {
        return true;
    }
    subscriptions
        .iter()
        .any(|sub| sub.is_active(now) && allowed_plans.contains(&sub.plan_id))
}
