//! Eligibility resolution: data loading around the pure decision in
//! `studiobook_core::eligibility`.

use chrono::Utc;
use sqlx::PgPool;
use studiobook_core::eligibility::is_eligible;
use studiobook_core::types::DbId;
use studiobook_db::models::class_option::ClassOption;
use studiobook_db::models::user::User;
use studiobook_db::repositories::{BookingRepo, ClassOptionRepo, PlanRepo, SubscriptionRepo};

use crate::error::{AppError, AppResult};

/// Result of resolving eligibility for one user and class option.
#[derive(Debug)]
pub struct Eligibility {
    pub eligible: bool,
    /// The identity whose subscriptions were checked: the user, or the
    /// parent for a child account (exactly one hop).
    pub paying_user_id: DbId,
}

/// Resolve whether `user` may book `class_option`.
///
/// The paying identity is the user's parent when `parent_id` is set —
/// children never hold their own subscriptions. The decision itself is
/// the pure function in `studiobook_core`.
pub async fn resolve(
    pool: &PgPool,
    tenant_id: DbId,
    user: &User,
    class_option: &ClassOption,
) -> AppResult<Eligibility> {
    let paying_user_id = user.parent_id.unwrap_or(user.id);

    let allowed_plans = ClassOptionRepo::allowed_plan_ids(pool, class_option.id).await?;
    let has_drop_in = class_option.drop_in_id.is_some();

    // Open options and drop-in options need no subscription lookup.
    if allowed_plans.is_empty() || has_drop_in {
        return Ok(Eligibility {
            eligible: true,
            paying_user_id,
        });
    }

    let subscriptions = SubscriptionRepo::list_for_user(pool, tenant_id, paying_user_id).await?;
    let facts: Vec<_> = subscriptions.iter().map(|s| s.facts()).collect();

    Ok(Eligibility {
        eligible: is_eligible(Utc::now(), &allowed_plans, has_drop_in, &facts),
        paying_user_id,
    })
}

/// Enforce the delegated-seat quota of child/family plans.
///
/// When a child account books through a parent's subscription, the
/// number of confirmed bookings on the lesson delegated to that parent
/// must stay within the plan's `quantity`. Plans without a quantity are
/// unlimited.
pub async fn check_delegated_quota(
    pool: &PgPool,
    tenant_id: DbId,
    lesson_id: DbId,
    parent_id: DbId,
    class_option: &ClassOption,
) -> AppResult<()> {
    let allowed_plans = ClassOptionRepo::allowed_plan_ids(pool, class_option.id).await?;
    if allowed_plans.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let subscriptions = SubscriptionRepo::list_for_user(pool, tenant_id, parent_id).await?;
    let active_plan = subscriptions
        .iter()
        .map(|s| s.facts())
        .find(|facts| facts.is_active(now) && allowed_plans.contains(&facts.plan_id));

    let Some(facts) = active_plan else {
        // No active allowed subscription; the eligibility check already
        // decides whether that blocks the booking (drop-in may apply).
        return Ok(());
    };

    let Some(plan) = PlanRepo::find_by_id(pool, tenant_id, facts.plan_id).await? else {
        return Ok(());
    };

    let Some(quantity) = plan.quantity else {
        return Ok(());
    };

    let delegated = BookingRepo::count_confirmed_delegated(pool, lesson_id, parent_id).await?;
    if delegated >= i64::from(quantity) {
        return Err(AppError::Booking(
            studiobook_core::error::BookingError::NotEligible(format!(
                "Plan covers {quantity} seats per lesson and all are taken"
            )),
        ));
    }

    Ok(())
}
