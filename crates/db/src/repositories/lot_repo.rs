//! Repository for the `parking_lots` and `parking_slots` tables (registry
//! side: lot CRUD, slot fan-out, resize, occupancy counts).

use parkwise_core::booking::validate_lot_input;
use parkwise_core::error::CoreError;
use parkwise_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::lot::{CreateLot, Lot, LotOccupancy, LotResize, LotWithOccupancy, UpdateLot};

/// Column list for `parking_lots` queries.
const COLUMNS: &str = "id, name, address, pincode, price_per_hour, total_slots, created_at";

/// Default slot count when a create request omits `total_slots`.
const DEFAULT_TOTAL_SLOTS: i32 = 20;

/// Provides CRUD and occupancy operations for parking lots.
pub struct LotRepo;

impl LotRepo {
    /// Create a lot and its slots numbered 1..N, all initially available.
    ///
    /// Both inserts run in one transaction: a lot never exists without its
    /// slot rows.
    pub async fn create(pool: &PgPool, input: &CreateLot) -> Result<Lot, RepoError> {
        let total_slots = input.total_slots.unwrap_or(DEFAULT_TOTAL_SLOTS);
        validate_lot_input(&input.name, &input.address, input.price_per_hour, total_slots)?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO parking_lots (name, address, pincode, price_per_hour, total_slots) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let lot = sqlx::query_as::<_, Lot>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.pincode)
            .bind(input.price_per_hour)
            .bind(total_slots)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO parking_slots (lot_id, slot_number) \
             SELECT $1, g FROM generate_series(1, $2) AS g",
        )
        .bind(lot.id)
        .bind(total_slots)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(lot_id = lot.id, total_slots, "Created parking lot");
        Ok(lot)
    }

    /// Find a lot by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_lots WHERE id = $1");
        sqlx::query_as::<_, Lot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all lots with their live occupancy counts, ordered by name.
    pub async fn list_with_occupancy(pool: &PgPool) -> Result<Vec<LotWithOccupancy>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM parking_lots ORDER BY name");
        let lots = sqlx::query_as::<_, Lot>(&query).fetch_all(pool).await?;

        let mut result = Vec::with_capacity(lots.len());
        for lot in lots {
            let occupancy = Self::count_occupancy(pool, lot.id).await?;
            result.push(LotWithOccupancy { lot, occupancy });
        }
        Ok(result)
    }

    /// Partially update a lot, resizing its slot range when `total_slots`
    /// changes.
    ///
    /// Growing appends available slots numbered from the current maximum.
    /// Shrinking deletes only available slots beyond the new total; occupied
    /// slots are never deleted, so the lot can end up holding more slots
    /// than `total_slots` states. That overflow is reported in the result
    /// and logged as a warning rather than silently reconciled.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLot,
    ) -> Result<LotResize, RepoError> {
        if let Some(price) = input.price_per_hour {
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::Validation(format!(
                    "price_per_hour must be non-negative, got {price}"
                ))
                .into());
            }
        }
        if let Some(total) = input.total_slots {
            if total <= 0 {
                return Err(CoreError::Validation(format!(
                    "total_slots must be positive, got {total}"
                ))
                .into());
            }
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE parking_lots SET \
                name = COALESCE($2, name), \
                address = COALESCE($3, address), \
                pincode = COALESCE($4, pincode), \
                price_per_hour = COALESCE($5, price_per_hour), \
                total_slots = COALESCE($6, total_slots) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let lot = sqlx::query_as::<_, Lot>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.pincode)
            .bind(input.price_per_hour)
            .bind(input.total_slots)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Parking lot",
                id,
            })?;

        let mut overflow_slots: i64 = 0;
        if let Some(new_total) = input.total_slots {
            let (current_count,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM parking_slots WHERE lot_id = $1")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;

            if i64::from(new_total) > current_count {
                sqlx::query(
                    "INSERT INTO parking_slots (lot_id, slot_number) \
                     SELECT $1, g FROM generate_series($2, $3) AS g",
                )
                .bind(id)
                .bind(i32::try_from(current_count + 1).unwrap_or(i32::MAX))
                .bind(new_total)
                .execute(&mut *tx)
                .await?;
            } else if i64::from(new_total) < current_count {
                sqlx::query(
                    "DELETE FROM parking_slots \
                     WHERE lot_id = $1 AND slot_number > $2 AND is_available",
                )
                .bind(id)
                .bind(new_total)
                .execute(&mut *tx)
                .await?;

                let (remaining,): (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM parking_slots WHERE lot_id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                overflow_slots = (remaining - i64::from(new_total)).max(0);
            }
        }

        tx.commit().await?;

        if overflow_slots > 0 {
            tracing::warn!(
                lot_id = id,
                overflow_slots,
                "Lot shrink blocked by occupied slots; lot holds more slots than total_slots states"
            );
        }

        Ok(LotResize {
            lot,
            overflow_slots,
        })
    }

    /// Delete a lot. Slots cascade via FK; booking history cascades with
    /// the lot reference. Returns an error if the lot does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM parking_lots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound {
                entity: "Parking lot",
                id,
            }
            .into());
        }

        tracing::info!(lot_id = id, "Deleted parking lot");
        Ok(())
    }

    /// Occupancy counts for one lot. Fails with `NotFound` for an absent
    /// lot so an empty lot and a missing lot are distinguishable.
    pub async fn occupancy(pool: &PgPool, id: DbId) -> Result<LotOccupancy, RepoError> {
        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM parking_lots WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "Parking lot",
                id,
            }
            .into());
        }

        Self::count_occupancy(pool, id).await.map_err(Into::into)
    }

    /// Shared occupancy counting query.
    async fn count_occupancy(pool: &PgPool, lot_id: DbId) -> Result<LotOccupancy, sqlx::Error> {
        let (total, available, occupied): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE is_available), \
                    COUNT(*) FILTER (WHERE NOT is_available) \
             FROM parking_slots WHERE lot_id = $1",
        )
        .bind(lot_id)
        .fetch_one(pool)
        .await?;

        Ok(LotOccupancy {
            total,
            available,
            occupied,
        })
    }
}
