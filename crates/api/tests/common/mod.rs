//! Shared fixtures for the api integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use studiobook_api::config::ServerConfig;
use studiobook_api::router::build_app_router;
use studiobook_api::state::AppState;
use studiobook_core::types::DbId;
use studiobook_db::models::class_option::{ClassOption, CreateClassOption, OPTION_TYPE_ADULT};
use studiobook_db::models::lesson::{CreateLesson, Lesson};
use studiobook_db::models::plan::{CreatePlan, Plan};
use studiobook_db::models::subscription::CreateSubscription;
use studiobook_db::models::user::{CreateUser, User};
use studiobook_db::repositories::{
    ClassOptionRepo, LessonRepo, PlanRepo, SubscriptionRepo, TenantRepo, UserRepo,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool. Mirrors the construction in `main.rs` so
/// integration tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(studiobook_events::EventBus::default()),
    };
    build_app_router(state, &config)
}

pub async fn tenant(pool: &PgPool) -> DbId {
    TenantRepo::create(pool, "test-studio").await.unwrap().id
}

pub async fn member(pool: &PgPool, tenant_id: DbId, email: &str) -> User {
    UserRepo::create(
        pool,
        tenant_id,
        &CreateUser {
            name: email.to_string(),
            email: email.to_string(),
            role: None,
            parent_id: None,
        },
    )
    .await
    .unwrap()
}

pub async fn child_of(pool: &PgPool, tenant_id: DbId, parent_id: DbId, email: &str) -> User {
    UserRepo::create(
        pool,
        tenant_id,
        &CreateUser {
            name: email.to_string(),
            email: email.to_string(),
            role: None,
            parent_id: Some(parent_id),
        },
    )
    .await
    .unwrap()
}

pub async fn class_option(pool: &PgPool, tenant_id: DbId, places: i32) -> ClassOption {
    ClassOptionRepo::create(
        pool,
        tenant_id,
        &CreateClassOption {
            name: "Open Mat".to_string(),
            option_type: OPTION_TYPE_ADULT.to_string(),
            places,
            drop_in_id: None,
        },
    )
    .await
    .unwrap()
}

pub async fn plan(pool: &PgPool, tenant_id: DbId, quantity: Option<i32>) -> Plan {
    PlanRepo::create(
        pool,
        tenant_id,
        &CreatePlan {
            name: "Family Plan".to_string(),
            plan_type: "family".to_string(),
            quantity,
        },
    )
    .await
    .unwrap()
}

/// An `active` subscription covering now plus/minus 30 days.
pub async fn active_subscription(pool: &PgPool, tenant_id: DbId, user_id: DbId, plan_id: DbId) {
    subscription(pool, tenant_id, user_id, plan_id, "active", 30).await;
}

pub async fn subscription(
    pool: &PgPool,
    tenant_id: DbId,
    user_id: DbId,
    plan_id: DbId,
    status: &str,
    days_remaining: i64,
) {
    let now = Utc::now();
    SubscriptionRepo::create(
        pool,
        tenant_id,
        &CreateSubscription {
            user_id,
            plan_id,
            status: status.to_string(),
            start_date: now - Duration::days(30),
            end_date: now + Duration::days(days_remaining),
        },
    )
    .await
    .unwrap();
}

/// A one-hour lesson starting `start_in` from now, inheriting capacity
/// from the class option.
pub async fn lesson_in(
    pool: &PgPool,
    tenant_id: DbId,
    class_option_id: DbId,
    start_in: Duration,
    lockout_minutes: i32,
) -> Lesson {
    let start = Utc::now() + start_in;
    LessonRepo::create(
        pool,
        tenant_id,
        &CreateLesson {
            class_option_id,
            start_time: start,
            end_time: start + Duration::hours(1),
            places: None,
            lockout_minutes,
            original_lockout_minutes: None,
            location: None,
        },
    )
    .await
    .unwrap()
}
