//! Интеграционные тесты движка резервирования поверх живого Postgres.
//! Запуск: DATABASE_URL=... cargo test -- --ignored

use sqlx::PgPool;

use reservation_system::error::ApiError;
use reservation_system::models::seat::SeatRef;
use reservation_system::services::ReservationEngine;
use reservation_system::stores::{users::NewUser, SeatStore, UserStore};

async fn create_user(pool: &PgPool, name: &str, email: &str) -> i64 {
    UserStore::new(pool.clone())
        .create(NewUser {
            name: name.into(),
            email: email.into(),
        })
        .await
        .expect("user creation failed")
        .user_id
}

async fn reservation_count(pool: &PgPool, seat: SeatRef) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reservations WHERE seat_row = $1 AND seat_number = $2",
    )
    .bind(seat.row)
    .bind(seat.number)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn reserve_flips_flag_and_creates_one_row(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user = create_user(&pool, "Ivan", "ivan@example.com").await;
    let seat = SeatRef::new(3, 5);

    assert!(!engine.is_reserved(seat).await);

    let res = engine.reserve(user, seat).await.unwrap();
    assert_eq!(res.user_id, user);
    assert_eq!(res.seat_row, 3);
    assert_eq!(res.seat_number, 5);

    assert!(engine.is_reserved(seat).await);
    assert_eq!(reservation_count(&pool, seat).await, 1);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn reserve_is_not_idempotent(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user = create_user(&pool, "Ivan", "ivan@example.com").await;
    let seat = SeatRef::new(1, 1);

    engine.reserve(user, seat).await.unwrap();

    // Повтор даже тем же пользователем - конфликт, второй строки нет
    let err = engine.reserve(user, seat).await.unwrap_err();
    assert!(matches!(err, ApiError::ReservationAlreadyExists));
    assert_eq!(reservation_count(&pool, seat).await, 1);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn full_scenario_two_users(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user1 = create_user(&pool, "Ivan", "ivan@example.com").await;
    let user2 = create_user(&pool, "Petr", "petr@example.com").await;
    let seat = SeatRef::new(3, 5);

    // Пользователь 1 занимает место
    let r1 = engine.reserve(user1, seat).await.unwrap();
    assert!(engine.is_reserved(seat).await);

    // Пользователь 2 получает конфликт, состояние не меняется
    let err = engine.reserve(user2, seat).await.unwrap_err();
    assert!(matches!(err, ApiError::ReservationAlreadyExists));
    assert!(engine.is_reserved(seat).await);
    assert_eq!(reservation_count(&pool, seat).await, 1);

    // Пользователь 1 освобождает место
    engine.delete_reservation(user1, seat).await.unwrap();
    assert!(!engine.is_reserved(seat).await);
    assert_eq!(reservation_count(&pool, seat).await, 0);

    // Теперь пользователь 2 занимает его с новым id
    let r2 = engine.reserve(user2, seat).await.unwrap();
    assert_ne!(r2.reservation_id, r1.reservation_id);
    assert!(engine.is_reserved(seat).await);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn concurrent_reserves_have_exactly_one_winner(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user1 = create_user(&pool, "Ivan", "ivan@example.com").await;
    let user2 = create_user(&pool, "Petr", "petr@example.com").await;
    let seat = SeatRef::new(7, 7);

    let e1 = engine.clone();
    let e2 = engine.clone();
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { e1.reserve(user1, seat).await }),
        tokio::spawn(async move { e2.reserve(user2, seat).await }),
    );
    let results = [r1.unwrap(), r2.unwrap()];

    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ApiError::ReservationAlreadyExists)))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(reservation_count(&pool, seat).await, 1);
    assert!(engine.is_reserved(seat).await);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn delete_by_non_owner_changes_nothing(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let owner = create_user(&pool, "Ivan", "ivan@example.com").await;
    let other = create_user(&pool, "Petr", "petr@example.com").await;
    let seat = SeatRef::new(2, 4);

    engine.reserve(owner, seat).await.unwrap();

    let err = engine.delete_reservation(other, seat).await.unwrap_err();
    assert!(matches!(err, ApiError::NoPermission));

    // Состояние нетронуто
    assert!(engine.is_reserved(seat).await);
    assert_eq!(reservation_count(&pool, seat).await, 1);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn delete_on_free_seat_is_not_found(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user = create_user(&pool, "Ivan", "ivan@example.com").await;

    let err = engine
        .delete_reservation(user, SeatRef::new(4, 4))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ReservationNotFound));
}

// Регрессия: удаление должно сравнивать И ряд, И номер места.
#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn delete_matches_on_both_row_and_number(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user = create_user(&pool, "Ivan", "ivan@example.com").await;
    let seat = SeatRef::new(3, 5);

    engine.reserve(user, seat).await.unwrap();

    // Совпадает только ряд
    let err = engine
        .delete_reservation(user, SeatRef::new(3, 7))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ReservationNotFound));

    // Совпадает только номер
    let err = engine
        .delete_reservation(user, SeatRef::new(5, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ReservationNotFound));

    // Исходное резервирование цело
    assert!(engine.is_reserved(seat).await);
    assert_eq!(reservation_count(&pool, seat).await, 1);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn is_reserved_defaults_to_false(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());

    // Нулевая ссылка - false без похода в базу
    assert!(!engine.is_reserved(SeatRef::new(0, 0)).await);
    // Несуществующее место - тоже false, без ошибки
    assert!(!engine.is_reserved(SeatRef::new(999, 999)).await);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn reserve_unknown_seat_is_a_validation_error(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let user = create_user(&pool, "Ivan", "ivan@example.com").await;

    let err = engine
        .reserve(user, SeatRef::new(999, 999))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(reservation_count(&pool, SeatRef::new(999, 999)).await, 0);
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn duplicate_email_is_rejected(pool: PgPool) {
    let store = UserStore::new(pool.clone());

    store
        .create(NewUser {
            name: "Ivan".into(),
            email: "ivan@example.com".into(),
        })
        .await
        .unwrap();

    let err = store
        .create(NewUser {
            name: "Another Ivan".into(),
            email: "ivan@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::DuplicateUser));
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn user_lookups(pool: PgPool) {
    let store = UserStore::new(pool.clone());
    let id = create_user(&pool, "Ivan", "ivan@example.com").await;

    let user = store.get_by_id(id).await.unwrap();
    assert_eq!(user.email, "ivan@example.com");

    assert_eq!(store.get_id_by_email("ivan@example.com").await.unwrap(), id);

    assert!(matches!(
        store.get_by_id(id + 1000).await.unwrap_err(),
        ApiError::UserNotFound
    ));
    assert!(matches!(
        store.get_id_by_email("nobody@example.com").await.unwrap_err(),
        ApiError::UserNotFound
    ));
}

#[sqlx::test(migrations = "./src/migrations")]
#[ignore = "needs a running Postgres"]
async fn seat_listings_track_reservations(pool: PgPool) {
    let engine = ReservationEngine::new(pool.clone());
    let seats = SeatStore::new(pool.clone());
    let user = create_user(&pool, "Ivan", "ivan@example.com").await;

    let total = seats.list_all().await.unwrap().len();
    assert_eq!(seats.list_free().await.unwrap().len(), total);
    assert!(seats.list_reserved().await.unwrap().is_empty());

    engine.reserve(user, SeatRef::new(1, 1)).await.unwrap();
    engine.reserve(user, SeatRef::new(1, 2)).await.unwrap();

    assert_eq!(seats.list_free().await.unwrap().len(), total - 2);

    let reserved = seats.list_reserved().await.unwrap();
    assert_eq!(reserved.len(), 2);
    assert!(reserved.iter().all(|s| s.is_reserved));
}
