//! Integration tests for the lot/slot registry: creation fan-out,
//! occupancy counts, resize semantics, and cascade deletion.

use assert_matches::assert_matches;
use parkwise_core::error::CoreError;
use parkwise_db::models::booking::BookSlot;
use parkwise_db::models::lot::{CreateLot, UpdateLot};
use parkwise_db::models::user::CreateUser;
use parkwise_db::repositories::{BookingRepo, LotRepo, SlotRepo, UserRepo};
use parkwise_db::RepoError;
use sqlx::PgPool;

fn new_lot(name: &str, total_slots: i32) -> CreateLot {
    CreateLot {
        name: name.to_string(),
        address: "1 Main Street".to_string(),
        pincode: Some("560001".to_string()),
        price_per_hour: 50.0,
        total_slots: Some(total_slots),
    }
}

fn resize_to(total_slots: i32) -> UpdateLot {
    UpdateLot {
        name: None,
        address: None,
        pincode: None,
        price_per_hour: None,
        total_slots: Some(total_slots),
    }
}

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            phone: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_lot_fans_out_numbered_slots(pool: PgPool) {
    let lot = LotRepo::create(&pool, &new_lot("Central", 5)).await.unwrap();
    assert_eq!(lot.total_slots, 5);

    let board = SlotRepo::board_for_lot(&pool, lot.id).await.unwrap();
    assert_eq!(board.len(), 5);
    for (i, slot) in board.iter().enumerate() {
        assert_eq!(slot.slot_number, i as i32 + 1);
        assert!(slot.is_available);
        assert!(slot.current_booking_code.is_none());
    }

    let occupancy = LotRepo::occupancy(&pool, lot.id).await.unwrap();
    assert_eq!(
        (occupancy.total, occupancy.available, occupancy.occupied),
        (5, 5, 0)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_lot_rejects_bad_input(pool: PgPool) {
    let mut input = new_lot("", 5);
    assert_matches!(
        LotRepo::create(&pool, &input).await,
        Err(RepoError::Domain(CoreError::Validation(_)))
    );

    input = new_lot("Central", 5);
    input.price_per_hour = -1.0;
    assert_matches!(
        LotRepo::create(&pool, &input).await,
        Err(RepoError::Domain(CoreError::Validation(_)))
    );

    input = new_lot("Central", 0);
    assert_matches!(
        LotRepo::create(&pool, &input).await,
        Err(RepoError::Domain(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resize_grow_appends_available_slots(pool: PgPool) {
    let lot = LotRepo::create(&pool, &new_lot("Central", 3)).await.unwrap();

    let resized = LotRepo::update(&pool, lot.id, &resize_to(6)).await.unwrap();
    assert_eq!(resized.lot.total_slots, 6);
    assert_eq!(resized.overflow_slots, 0);

    let board = SlotRepo::board_for_lot(&pool, lot.id).await.unwrap();
    assert_eq!(board.len(), 6);
    assert_eq!(board.last().unwrap().slot_number, 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resize_shrink_deletes_only_available_slots(pool: PgPool) {
    let lot = LotRepo::create(&pool, &new_lot("Central", 4)).await.unwrap();

    let resized = LotRepo::update(&pool, lot.id, &resize_to(2)).await.unwrap();
    assert_eq!(resized.overflow_slots, 0);

    let occupancy = LotRepo::occupancy(&pool, lot.id).await.unwrap();
    assert_eq!(occupancy.total, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resize_shrink_blocked_by_occupied_slot_reports_overflow(pool: PgPool) {
    let user_id = seed_user(&pool, "overflow@example.com").await;
    let lot = LotRepo::create(&pool, &new_lot("Central", 4)).await.unwrap();
    let board = SlotRepo::board_for_lot(&pool, lot.id).await.unwrap();

    // Occupy slot 4, then shrink to 2: slot 3 goes, slot 4 stays.
    BookingRepo::book(
        &pool,
        user_id,
        &BookSlot {
            lot_id: lot.id,
            slot_id: board[3].id,
            vehicle_number: "KA01AB1234".to_string(),
            duration: Some(1.0),
            start_time: None,
            end_time: None,
        },
    )
    .await
    .unwrap();

    let resized = LotRepo::update(&pool, lot.id, &resize_to(2)).await.unwrap();
    assert_eq!(resized.lot.total_slots, 2);
    assert_eq!(resized.overflow_slots, 1);

    let occupancy = LotRepo::occupancy(&pool, lot.id).await.unwrap();
    assert_eq!(occupancy.total, 3);
    assert_eq!(occupancy.occupied, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_lot_is_not_found(pool: PgPool) {
    assert_matches!(
        LotRepo::update(&pool, 999_999, &resize_to(5)).await,
        Err(RepoError::Domain(CoreError::NotFound { .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_lot_cascades_slots_and_bookings(pool: PgPool) {
    let user_id = seed_user(&pool, "cascade@example.com").await;
    let lot = LotRepo::create(&pool, &new_lot("Central", 2)).await.unwrap();
    let board = SlotRepo::board_for_lot(&pool, lot.id).await.unwrap();

    let booking = BookingRepo::book(
        &pool,
        user_id,
        &BookSlot {
            lot_id: lot.id,
            slot_id: board[0].id,
            vehicle_number: "KA01AB1234".to_string(),
            duration: Some(1.0),
            start_time: None,
            end_time: None,
        },
    )
    .await
    .unwrap();

    LotRepo::delete(&pool, lot.id).await.unwrap();

    assert!(LotRepo::find_by_id(&pool, lot.id).await.unwrap().is_none());
    assert!(SlotRepo::find_by_id(&pool, board[0].id)
        .await
        .unwrap()
        .is_none());
    assert!(BookingRepo::find_by_code(&pool, &booking.booking_code)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_missing_lot_is_not_found(pool: PgPool) {
    assert_matches!(
        LotRepo::delete(&pool, 999_999).await,
        Err(RepoError::Domain(CoreError::NotFound { .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn occupancy_for_missing_lot_is_not_found(pool: PgPool) {
    assert_matches!(
        LotRepo::occupancy(&pool, 999_999).await,
        Err(RepoError::Domain(CoreError::NotFound { .. }))
    );
}
