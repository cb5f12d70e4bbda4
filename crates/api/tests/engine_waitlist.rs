//! Waitlist promotion signals.

use chrono::Duration;
use sqlx::PgPool;
use studiobook_api::engine::waitlist::promote_waitlist;
use studiobook_core::booking::BookingStatus;
use studiobook_db::repositories::BookingRepo;
use studiobook_events::EventBus;

mod common;

#[sqlx::test(migrations = "../../db/migrations")]
async fn signals_oldest_waiting_booking_for_one_freed_seat(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let option = common::class_option(&pool, tenant_id, 1).await;
    let lesson = common::lesson_in(&pool, tenant_id, option.id, Duration::hours(3), 30).await;

    let first = common::member(&pool, tenant_id, "first@example.com").await;
    let second = common::member(&pool, tenant_id, "second@example.com").await;
    let first_waiting = BookingRepo::insert_unguarded(
        &pool,
        tenant_id,
        lesson.id,
        first.id,
        BookingStatus::Waiting,
    )
    .await
    .unwrap();
    BookingRepo::insert_unguarded(
        &pool,
        tenant_id,
        lesson.id,
        second.id,
        BookingStatus::Waiting,
    )
    .await
    .unwrap();

    let bus = EventBus::default();
    let mut rx = bus.subscribe();

    // One free seat, two waiters: only the oldest is signalled.
    let signalled = promote_waitlist(&pool, &bus, tenant_id, lesson.id)
        .await
        .unwrap();
    assert_eq!(signalled, 1);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "waitlist.seat_available");
    assert_eq!(event.booking_id, Some(first_waiting.id));
    assert_eq!(event.user_id, Some(first.id));

    // The signal is advisory: the booking itself stays waiting until the
    // user confirms.
    let booking = BookingRepo::find_by_id(&pool, tenant_id, first_waiting.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.status(), BookingStatus::Waiting);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn no_signals_when_class_is_still_full(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let option = common::class_option(&pool, tenant_id, 1).await;
    let lesson = common::lesson_in(&pool, tenant_id, option.id, Duration::hours(3), 30).await;

    let holder = common::member(&pool, tenant_id, "holder@example.com").await;
    let waiter = common::member(&pool, tenant_id, "waiter@example.com").await;
    BookingRepo::insert_confirmed_guarded(&pool, tenant_id, lesson.id, holder.id)
        .await
        .unwrap();
    BookingRepo::insert_unguarded(
        &pool,
        tenant_id,
        lesson.id,
        waiter.id,
        BookingStatus::Waiting,
    )
    .await
    .unwrap();

    let bus = EventBus::default();
    let signalled = promote_waitlist(&pool, &bus, tenant_id, lesson.id)
        .await
        .unwrap();
    assert_eq!(signalled, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_lesson_is_a_no_op(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let bus = EventBus::default();
    assert_eq!(
        promote_waitlist(&pool, &bus, tenant_id, 424242).await.unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn multiple_freed_seats_signal_in_arrival_order(pool: PgPool) {
    let tenant_id = common::tenant(&pool).await;
    let option = common::class_option(&pool, tenant_id, 3).await;
    let lesson = common::lesson_in(&pool, tenant_id, option.id, Duration::hours(3), 30).await;

    let mut waiting_ids = Vec::new();
    for i in 0..3 {
        let user = common::member(&pool, tenant_id, &format!("w{i}@example.com")).await;
        let booking = BookingRepo::insert_unguarded(
            &pool,
            tenant_id,
            lesson.id,
            user.id,
            BookingStatus::Waiting,
        )
        .await
        .unwrap();
        waiting_ids.push(booking.id);
    }

    let bus = EventBus::default();
    let mut rx = bus.subscribe();
    let signalled = promote_waitlist(&pool, &bus, tenant_id, lesson.id)
        .await
        .unwrap();
    assert_eq!(signalled, 3);

    for expected in waiting_ids {
        let event = rx.recv().await.unwrap();
        assert_eq!(event.booking_id, Some(expected));
    }
}
