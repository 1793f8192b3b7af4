//! Parking lot entity models and DTOs.

use parkwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parking_lots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lot {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub pincode: Option<String>,
    pub price_per_hour: f64,
    pub total_slots: i32,
    pub created_at: Timestamp,
}

/// DTO for creating a lot via `POST /api/v1/parking-lots`.
#[derive(Debug, Deserialize)]
pub struct CreateLot {
    pub name: String,
    pub address: String,
    pub pincode: Option<String>,
    pub price_per_hour: f64,
    /// Number of slots to create, numbered 1..N. Defaults to 20.
    pub total_slots: Option<i32>,
}

/// DTO for partial lot updates, including resizing the slot count.
#[derive(Debug, Deserialize)]
pub struct UpdateLot {
    pub name: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub price_per_hour: Option<f64>,
    pub total_slots: Option<i32>,
}

/// Slot occupancy counts for one lot.
///
/// `available + occupied == total` holds after every booking transition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LotOccupancy {
    pub total: i64,
    pub available: i64,
    pub occupied: i64,
}

/// A lot together with its live occupancy counts.
#[derive(Debug, Serialize)]
pub struct LotWithOccupancy {
    #[serde(flatten)]
    pub lot: Lot,
    pub occupancy: LotOccupancy,
}

/// Result of a lot update that may have resized the slot range.
///
/// `overflow_slots` counts slots above the stated `total_slots` that could
/// not be removed because they are occupied. Zero for pure grows and clean
/// shrinks.
#[derive(Debug, Serialize)]
pub struct LotResize {
    #[serde(flatten)]
    pub lot: Lot,
    pub overflow_slots: i64,
}
