//! Repository for the `parking_slots` table (read side: slot lookups and
//! the live slot board). Occupancy transitions live in
//! [`crate::repositories::BookingRepo`] so they stay atomic with the
//! booking row.

use chrono::Utc;
use parkwise_core::error::CoreError;
use parkwise_core::snapshot;
use parkwise_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::slot::{Slot, SlotBoardRow, SlotView};

/// Column list for `parking_slots` queries.
const COLUMNS: &str = "id, lot_id, slot_number, is_available, current_user_id, \
    current_booking_code, vehicle_number, booking_start_time, planned_duration_hours";

/// Provides read operations for parking slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Find a slot by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The slot board for a lot: every slot ordered by number, occupied
    /// slots carrying a live snapshot derived at read time.
    ///
    /// Snapshot values (current duration, running cost) are never
    /// persisted. A missing start time on an occupied slot degrades the
    /// snapshot to planned values rather than failing the read.
    pub async fn board_for_lot(pool: &PgPool, lot_id: DbId) -> Result<Vec<SlotView>, RepoError> {
        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM parking_lots WHERE id = $1")
            .bind(lot_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "Parking lot",
                id: lot_id,
            }
            .into());
        }

        let rows = sqlx::query_as::<_, SlotBoardRow>(
            "SELECT ps.id, ps.lot_id, ps.slot_number, ps.is_available, \
                    ps.current_user_id, ps.current_booking_code, ps.vehicle_number, \
                    ps.booking_start_time, ps.planned_duration_hours, \
                    pl.price_per_hour AS hourly_rate \
             FROM parking_slots ps \
             JOIN parking_lots pl ON pl.id = ps.lot_id \
             WHERE ps.lot_id = $1 \
             ORDER BY ps.slot_number",
        )
        .bind(lot_id)
        .fetch_all(pool)
        .await?;

        let now = Utc::now();
        let views = rows
            .into_iter()
            .map(|row| {
                let snap = if row.is_available {
                    None
                } else {
                    Some(snapshot::current_snapshot(
                        row.booking_start_time,
                        row.planned_duration_hours,
                        row.hourly_rate,
                        now,
                    ))
                };
                SlotView {
                    id: row.id,
                    lot_id: row.lot_id,
                    slot_number: row.slot_number,
                    is_available: row.is_available,
                    current_user_id: row.current_user_id,
                    current_booking_code: row.current_booking_code,
                    vehicle_number: row.vehicle_number,
                    booking_start_time: row.booking_start_time,
                    planned_duration_hours: row.planned_duration_hours,
                    hourly_rate: row.hourly_rate,
                    snapshot: snap,
                }
            })
            .collect();

        Ok(views)
    }
}
