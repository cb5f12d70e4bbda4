//! Shared fixtures for the db integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use studiobook_core::types::DbId;
use studiobook_db::models::class_option::{ClassOption, CreateClassOption, OPTION_TYPE_ADULT};
use studiobook_db::models::lesson::{CreateLesson, Lesson};
use studiobook_db::models::user::{CreateUser, User, ROLE_STAFF};
use studiobook_db::repositories::{ClassOptionRepo, LessonRepo, TenantRepo, UserRepo};

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

pub async fn staff(pool: &PgPool, tenant_id: DbId, email: &str) -> User {
    UserRepo::create(
        pool,
        tenant_id,
        &CreateUser {
            name: email.to_string(),
            email: email.to_string(),
            role: Some(ROLE_STAFF.to_string()),
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
