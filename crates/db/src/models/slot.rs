//! Parking slot entity models.
//!
//! The occupant binding columns (`current_user_id`, `current_booking_code`,
//! `vehicle_number`, `booking_start_time`, `planned_duration_hours`) are
//! populated iff `is_available` is false; the schema CHECK constraint
//! enforces this, and every repository transition writes them in lock-step
//! with the owning booking.

use parkwise_core::snapshot::SlotSnapshot;
use parkwise_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `parking_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slot {
    pub id: DbId,
    pub lot_id: DbId,
    pub slot_number: i32,
    pub is_available: bool,
    pub current_user_id: Option<DbId>,
    pub current_booking_code: Option<String>,
    pub vehicle_number: Option<String>,
    pub booking_start_time: Option<Timestamp>,
    pub planned_duration_hours: Option<f64>,
}

/// A slot row joined with its lot's rate, as read for the slot board.
#[derive(Debug, Clone, FromRow)]
pub struct SlotBoardRow {
    pub id: DbId,
    pub lot_id: DbId,
    pub slot_number: i32,
    pub is_available: bool,
    pub current_user_id: Option<DbId>,
    pub current_booking_code: Option<String>,
    pub vehicle_number: Option<String>,
    pub booking_start_time: Option<Timestamp>,
    pub planned_duration_hours: Option<f64>,
    pub hourly_rate: f64,
}

/// Slot board entry: the persisted slot plus a live snapshot derived at
/// query time for occupied slots. Snapshot values are never stored.
#[derive(Debug, Serialize)]
pub struct SlotView {
    pub id: DbId,
    pub lot_id: DbId,
    pub slot_number: i32,
    pub is_available: bool,
    pub current_user_id: Option<DbId>,
    pub current_booking_code: Option<String>,
    pub vehicle_number: Option<String>,
    pub booking_start_time: Option<Timestamp>,
    pub planned_duration_hours: Option<f64>,
    pub hourly_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SlotSnapshot>,
}
