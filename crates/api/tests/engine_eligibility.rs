//! Eligibility resolution against real subscription rows.

use chrono::Duration;
use sqlx::PgPool;
use studiobook_api::engine::eligibility::{check_delegated_quota, resolve};
use studiobook_api::error::AppError;
use studiobook_core::error::BookingError;
use studiobook_db::repositories::{BookingRepo, ClassOptionRepo};

mod common;

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_class_option_needs_no_subscription(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let user = common::member(&pool, tenant_id, "a@example.com").await;
    let option = common::class_option(&pool, tenant_id, 5).await;

    let eligibility = resolve(&pool, tenant_id, &user, &option).await.unwrap();
    assert!(eligibility.eligible);
    assert_eq!(eligibility.paying_user_id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_subscription_to_allowed_plan_is_eligible(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let user = common::member(&pool, tenant_id, "a@example.com").await;
    let option = common::class_option(&pool, tenant_id, 5).await;
    let plan = common::plan(&pool, tenant_id, None).await;
    ClassOptionRepo::allow_plan(&pool, option.id, plan.id)
        .await
        .unwrap();

    common::active_subscription(&pool, tenant_id, user.id, plan.id).await;

    let eligibility = resolve(&pool, tenant_id, &user, &option).await.unwrap();
    assert!(eligibility.eligible);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_subscription_is_not_eligible(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let user = common::member(&pool, tenant_id, "a@example.com").await;
    let option = common::class_option(&pool, tenant_id, 5).await;
    let plan = common::plan(&pool, tenant_id, None).await;
    ClassOptionRepo::allow_plan(&pool, option.id, plan.id)
        .await
        .unwrap();

    // Ended yesterday.
    common::subscription(&pool, tenant_id, user.id, plan.id, "active", -1).await;

    let eligibility = resolve(&pool, tenant_id, &user, &option).await.unwrap();
    assert!(!eligibility.eligible);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_due_subscription_blocks_booking(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let user = common::member(&pool, tenant_id, "a@example.com").await;
    let option = common::class_option(&pool, tenant_id, 5).await;
    let plan = common::plan(&pool, tenant_id, None).await;
    ClassOptionRepo::allow_plan(&pool, option.id, plan.id)
        .await
        .unwrap();

    common::subscription(&pool, tenant_id, user.id, plan.id, "past_due", 30).await;

    let eligibility = resolve(&pool, tenant_id, &user, &option).await.unwrap();
    assert!(!eligibility.eligible);
}

/// A child account delegates to the parent's subscriptions, one hop.
#[sqlx::test(migrations = "../../db/migrations")]
async fn child_account_uses_parent_subscription(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let parent = common::member(&pool, tenant_id, "parent@example.com").await;
    let child = common::child_of(&pool, tenant_id, parent.id, "kid@example.com").await;
    let option = common::class_option(&pool, tenant_id, 5).await;
    let plan = common::plan(&pool, tenant_id, Some(2)).await;
    ClassOptionRepo::allow_plan(&pool, option.id, plan.id)
        .await
        .unwrap();

    common::active_subscription(&pool, tenant_id, parent.id, plan.id).await;

    let eligibility = resolve(&pool, tenant_id, &child, &option).await.unwrap();
    assert!(eligibility.eligible);
    assert_eq!(eligibility.paying_user_id, parent.id);

    // A child without a subscribed parent is not eligible.
    let orphan_parent = common::member(&pool, tenant_id, "other@example.com").await;
    let orphan = common::child_of(&pool, tenant_id, orphan_parent.id, "orphan@example.com").await;
    let eligibility = resolve(&pool, tenant_id, &orphan, &option).await.unwrap();
    assert!(!eligibility.eligible);
}

/// Confirmed delegated seats on a lesson cannot exceed the plan's
/// quantity.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delegated_quota_caps_seats_per_lesson(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let parent = common::member(&pool, tenant_id, "parent@example.com").await;
    let kid_a = common::child_of(&pool, tenant_id, parent.id, "kid-a@example.com").await;
    let option = common::class_option(&pool, tenant_id, 10).await;
    let lesson = common::lesson_in(&pool, tenant_id, option.id, Duration::hours(3), 30).await;
    let plan = common::plan(&pool, tenant_id, Some(1)).await;
    ClassOptionRepo::allow_plan(&pool, option.id, plan.id)
        .await
        .unwrap();
    common::active_subscription(&pool, tenant_id, parent.id, plan.id).await;

    // Quota free: passes.
    check_delegated_quota(&pool, tenant_id, lesson.id, parent.id, &option)
        .await
        .unwrap();

    // One delegated seat confirmed; quantity 1 is now exhausted.
    BookingRepo::insert_confirmed_guarded(&pool, tenant_id, lesson.id, kid_a.id)
        .await
        .unwrap();

    let err = check_delegated_quota(&pool, tenant_id, lesson.id, parent.id, &option)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Booking(BookingError::NotEligible(_))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlimited_plan_has_no_delegated_quota(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let parent = common::member(&pool, tenant_id, "parent@example.com").await;
    let kid = common::child_of(&pool, tenant_id, parent.id, "kid@example.com").await;
    let option = common::class_option(&pool, tenant_id, 10).await;
    let lesson = common::lesson_in(&pool, tenant_id, option.id, Duration::hours(3), 30).await;
    let plan = common::plan(&pool, tenant_id, None).await;
    ClassOptionRepo::allow_plan(&pool, option.id, plan.id)
        .await
        .unwrap();
    common::active_subscription(&pool, tenant_id, parent.id, plan.id).await;

    BookingRepo::insert_confirmed_guarded(&pool, tenant_id, lesson.id, kid.id)
        .await
        .unwrap();

    check_delegated_quota(&pool, tenant_id, lesson.id, parent.id, &option)
        .await
        .unwrap();
}
