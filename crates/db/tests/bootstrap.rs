use sqlx::PgPool;

mod common;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn full_bootstrap(pool: PgPool) {
    studiobook_db::health_check(&pool).await.unwrap();

    let tables = [
        "tenants",
        "users",
        "plans",
        "subscriptions",
        "drop_ins",
        "class_options",
        "class_option_plans",
        "lessons",
        "bookings",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should exist and start empty");
    }
}

/// The status CHECK constraint keeps unknown text out of `bookings`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_status_check_rejects_unknown_text(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let user = common::member(&pool, tenant_id, "a@example.com").await;
    let option = common::class_option(&pool, tenant_id, 5).await;
    let lesson = common::lesson_in(
        &pool,
        tenant_id,
        option.id,
        chrono::Duration::hours(3),
        30,
    )
    .await;

    let result = sqlx::query(
        "INSERT INTO bookings (tenant_id, lesson_id, user_id, status) \
         VALUES ($1, $2, $3, 'expired')",
    )
    .bind(tenant_id)
    .bind(lesson.id)
    .bind(user.id)
    .execute(&pool)
    .await;

    assert!(result.is_err(), "unknown status text must be rejected");
}

/// Lessons must end after they start.
#[sqlx::test(migrations = "../../db/migrations")]
async fn lesson_time_order_enforced(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let option = common::class_option(&pool, tenant_id, 5).await;

    let start = chrono::Utc::now();
    let result = sqlx::query(
        "INSERT INTO lessons \
             (tenant_id, class_option_id, start_time, end_time, places, \
              lockout_minutes, original_lockout_minutes) \
         VALUES ($1, $2, $3, $3, 5, 30, 30)",
    )
    .bind(tenant_id)
    .bind(option.id)
    .bind(start)
    .execute(&pool)
    .await;

    assert!(result.is_err(), "end_time == start_time must be rejected");
}
