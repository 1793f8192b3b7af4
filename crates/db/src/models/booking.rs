//! Booking entity models and DTOs for the booking lifecycle.

use parkwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bookings` table.
///
/// `hourly_rate` is captured from the lot at booking time and never
/// rewritten. `end_time` holds the planned end until release overwrites it
/// with the real end; `actual_duration_hours`, `final_cost`, and
/// `completed_at` stay NULL until the booking transitions to `completed`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub booking_code: String,
    pub user_id: DbId,
    pub lot_id: DbId,
    pub slot_id: DbId,
    pub slot_number: i32,
    pub vehicle_number: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub planned_duration_hours: f64,
    pub actual_duration_hours: Option<f64>,
    pub hourly_rate: f64,
    pub planned_cost: f64,
    pub final_cost: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// DTO for reserving a slot via `POST /api/v1/bookings`.
#[derive(Debug, Deserialize)]
pub struct BookSlot {
    pub lot_id: DbId,
    pub slot_id: DbId,
    pub vehicle_number: String,
    /// Planned duration in hours. Defaults to 2.
    pub duration: Option<f64>,
    /// Optional client-supplied start, in any accepted timestamp format.
    pub start_time: Option<String>,
    /// Optional client-supplied end. Defaults to start + duration.
    pub end_time: Option<String>,
}

/// DTO for releasing a slot via `POST /api/v1/bookings/release`.
///
/// Either `booking_code` or `slot_id` must be present; the code wins when
/// both are given. Releasing by slot resolves the most recent active
/// booking on that slot.
#[derive(Debug, Deserialize)]
pub struct ReleaseSlot {
    pub booking_code: Option<String>,
    pub slot_id: Option<DbId>,
}

/// Receipt returned from a successful release.
#[derive(Debug, Serialize)]
pub struct ReleaseReceipt {
    pub booking_code: String,
    pub slot_id: DbId,
    pub slot_number: i32,
    pub vehicle_number: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Elapsed hours, rounded to 2 decimals.
    pub actual_duration_hours: f64,
    /// Elapsed hours times the captured hourly rate, rounded to 2 decimals.
    pub final_cost: f64,
    pub planned_duration_hours: f64,
    pub planned_cost: f64,
}

/// Query parameters for booking listings.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    /// Filter by status (`active`, `completed`, `cancelled`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Aggregate counts for `GET /api/v1/bookings/stats`.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct BookingStats {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Sum of `final_cost` over completed bookings.
    pub total_revenue: f64,
}

/// Summary of a forced release during user deletion.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ForceReleaseSummary {
    /// Slots whose occupant binding was cleared.
    pub slots_released: u64,
    /// Active bookings marked cancelled.
    pub bookings_cancelled: u64,
}
