//! Repository for the `bookings` table and the booking lifecycle.
//!
//! `book` and `release` each run as one transaction with the slot (or
//! booking) row locked `FOR UPDATE`, so two concurrent books on the same
//! slot serialize and the loser observes the occupied flag. The partial
//! unique index `uq_bookings_active_slot` is the backstop for the
//! one-active-booking-per-slot invariant.

use chrono::{Duration, Utc};
use parkwise_core::booking::{generate_booking_code, validate_booking_input, BookingStatus};
use parkwise_core::cost;
use parkwise_core::error::CoreError;
use parkwise_core::timestamp::{parse_flexible, truncate_to_seconds};
use parkwise_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoError;
use crate::models::booking::{
    BookSlot, Booking, BookingListQuery, BookingStats, ForceReleaseSummary, ReleaseReceipt,
    ReleaseSlot,
};

/// Column list for `bookings` queries.
const COLUMNS: &str = "\
    id, booking_code, user_id, lot_id, slot_id, slot_number, vehicle_number, \
    start_time, end_time, planned_duration_hours, actual_duration_hours, \
    hourly_rate, planned_cost, final_cost, status, created_at, completed_at";

/// Maximum page size for booking listings.
const MAX_LIMIT: i64 = 100;

/// Default page size for booking listings.
const DEFAULT_LIMIT: i64 = 50;

/// Planned duration applied when a booking request omits one.
const DEFAULT_PLANNED_DURATION_HOURS: f64 = 2.0;

/// The slot row as locked during booking.
#[derive(sqlx::FromRow)]
struct SlotForBooking {
    id: DbId,
    lot_id: DbId,
    slot_number: i32,
    is_available: bool,
    price_per_hour: f64,
}

/// Provides lifecycle operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Reserve a slot for a user.
    ///
    /// Atomically checks availability under a row lock, inserts the
    /// booking with the lot's current rate captured as `hourly_rate`, and
    /// flips the slot to occupied with its occupant binding. Either both
    /// writes land or neither does.
    pub async fn book(pool: &PgPool, user_id: DbId, input: &BookSlot) -> Result<Booking, RepoError> {
        let duration = input.duration.unwrap_or(DEFAULT_PLANNED_DURATION_HOURS);
        validate_booking_input(&input.vehicle_number, duration)?;

        let start_time = match &input.start_time {
            Some(raw) => parse_flexible(raw)?,
            None => truncate_to_seconds(Utc::now()),
        };
        let end_time = match &input.end_time {
            Some(raw) => parse_flexible(raw)?,
            None => start_time + Duration::milliseconds((duration * 3_600_000.0) as i64),
        };

        let mut tx = pool.begin().await?;

        let user_exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if user_exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }
            .into());
        }

        // Lock the slot row so concurrent books on it serialize here.
        let slot = sqlx::query_as::<_, SlotForBooking>(
            "SELECT ps.id, ps.lot_id, ps.slot_number, ps.is_available, pl.price_per_hour \
             FROM parking_slots ps \
             JOIN parking_lots pl ON pl.id = ps.lot_id \
             WHERE ps.id = $1 \
             FOR UPDATE OF ps",
        )
        .bind(input.slot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Slot",
            id: input.slot_id,
        })?;

        if slot.lot_id != input.lot_id {
            return Err(CoreError::NotFound {
                entity: "Slot",
                id: input.slot_id,
            }
            .into());
        }
        if !slot.is_available {
            return Err(CoreError::SlotUnavailable { slot_id: slot.id }.into());
        }

        let booking_code = generate_booking_code();
        let planned_cost = cost::planned_cost(duration, slot.price_per_hour);

        let query = format!(
            "INSERT INTO bookings \
                (booking_code, user_id, lot_id, slot_id, slot_number, vehicle_number, \
                 start_time, end_time, planned_duration_hours, hourly_rate, planned_cost, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(&booking_code)
            .bind(user_id)
            .bind(slot.lot_id)
            .bind(slot.id)
            .bind(slot.slot_number)
            .bind(input.vehicle_number.trim())
            .bind(start_time)
            .bind(end_time)
            .bind(duration)
            .bind(slot.price_per_hour)
            .bind(planned_cost)
            .bind(BookingStatus::Active.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE parking_slots SET \
                is_available = FALSE, \
                current_user_id = $2, \
                current_booking_code = $3, \
                vehicle_number = $4, \
                booking_start_time = $5, \
                planned_duration_hours = $6 \
             WHERE id = $1",
        )
        .bind(slot.id)
        .bind(user_id)
        .bind(&booking_code)
        .bind(input.vehicle_number.trim())
        .bind(start_time)
        .bind(duration)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            booking_code = %booking.booking_code,
            slot_id = slot.id,
            user_id,
            "Slot booked"
        );
        Ok(booking)
    }

    /// Release an active booking and free its slot.
    ///
    /// Resolves the booking by code, or by the most recent active booking
    /// on the given slot. The actual duration is clock-derived and clamped
    /// at zero; the final cost uses the rate captured at booking time,
    /// never the lot's current price. Atomic with the slot unbinding.
    pub async fn release(
        pool: &PgPool,
        user_id: DbId,
        input: &ReleaseSlot,
    ) -> Result<ReleaseReceipt, RepoError> {
        let mut tx = pool.begin().await?;

        let booking = match (&input.booking_code, input.slot_id) {
            (Some(code), _) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings \
                     WHERE booking_code = $1 AND status = $2 \
                     FOR UPDATE"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(code)
                    .bind(BookingStatus::Active.as_str())
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| CoreError::NotFoundByKey {
                        entity: "Active booking",
                        key: code.clone(),
                    })?
            }
            (None, Some(slot_id)) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings \
                     WHERE slot_id = $1 AND status = $2 \
                     ORDER BY id DESC LIMIT 1 \
                     FOR UPDATE"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(slot_id)
                    .bind(BookingStatus::Active.as_str())
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| CoreError::NotFoundByKey {
                        entity: "Active booking",
                        key: format!("slot {slot_id}"),
                    })?
            }
            (None, None) => {
                return Err(CoreError::Validation(
                    "Either booking_code or slot_id is required".to_string(),
                )
                .into());
            }
        };

        if booking.user_id != user_id {
            return Err(CoreError::Ownership {
                booking_code: booking.booking_code,
            }
            .into());
        }

        let now = truncate_to_seconds(Utc::now());
        let actual_duration = cost::elapsed_hours(booking.start_time, now);
        let final_cost = cost::final_cost(actual_duration, booking.hourly_rate);

        sqlx::query(
            "UPDATE bookings SET \
                end_time = $2, \
                actual_duration_hours = $3, \
                final_cost = $4, \
                status = $5, \
                completed_at = $2 \
             WHERE id = $1",
        )
        .bind(booking.id)
        .bind(now)
        .bind(actual_duration)
        .bind(final_cost)
        .bind(BookingStatus::Completed.as_str())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE parking_slots SET \
                is_available = TRUE, \
                current_user_id = NULL, \
                current_booking_code = NULL, \
                vehicle_number = NULL, \
                booking_start_time = NULL, \
                planned_duration_hours = NULL \
             WHERE id = $1",
        )
        .bind(booking.slot_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            booking_code = %booking.booking_code,
            slot_id = booking.slot_id,
            final_cost,
            "Slot released"
        );
        Ok(ReleaseReceipt {
            booking_code: booking.booking_code,
            slot_id: booking.slot_id,
            slot_number: booking.slot_number,
            vehicle_number: booking.vehicle_number,
            start_time: booking.start_time,
            end_time: now,
            actual_duration_hours: cost::round2(actual_duration),
            final_cost: cost::round2(final_cost),
            planned_duration_hours: booking.planned_duration_hours,
            planned_cost: booking.planned_cost,
        })
    }

    /// Force-release everything a user holds, for account deletion.
    ///
    /// Clears every slot occupied by the user and marks their active
    /// bookings cancelled. No cost finalization and no `end_time`: the
    /// bookings simply stop.
    pub async fn force_release_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<ForceReleaseSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let summary = Self::force_release_in_tx(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(summary)
    }

    /// Forced-release writes, for composing into a larger transaction
    /// (user deletion).
    pub(crate) async fn force_release_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
    ) -> Result<ForceReleaseSummary, sqlx::Error> {
        let slots = sqlx::query(
            "UPDATE parking_slots SET \
                is_available = TRUE, \
                current_user_id = NULL, \
                current_booking_code = NULL, \
                vehicle_number = NULL, \
                booking_start_time = NULL, \
                planned_duration_hours = NULL \
             WHERE current_user_id = $1",
        )
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        let bookings = sqlx::query(
            "UPDATE bookings SET status = $2 WHERE user_id = $1 AND status = $3",
        )
        .bind(user_id)
        .bind(BookingStatus::Cancelled.as_str())
        .bind(BookingStatus::Active.as_str())
        .execute(&mut **tx)
        .await?;

        let summary = ForceReleaseSummary {
            slots_released: slots.rows_affected(),
            bookings_cancelled: bookings.rows_affected(),
        };
        if summary.bookings_cancelled > 0 {
            tracing::info!(
                user_id,
                slots = summary.slots_released,
                bookings = summary.bookings_cancelled,
                "Force-released user's active bookings"
            );
        }
        Ok(summary)
    }

    /// Find a booking by its externally visible code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE booking_code = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List one user's bookings with optional status filter and pagination.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        params: &BookingListQuery,
    ) -> Result<Vec<Booking>, RepoError> {
        Self::list_bookings(pool, Some(user_id), params).await
    }

    /// List all bookings (admin view) with optional status filter and
    /// pagination.
    pub async fn list_all(
        pool: &PgPool,
        params: &BookingListQuery,
    ) -> Result<Vec<Booking>, RepoError> {
        Self::list_bookings(pool, None, params).await
    }

    /// Shared listing query builder. When `user_id` is `Some`, filters to
    /// that user's bookings; when `None`, returns all bookings.
    async fn list_bookings(
        pool: &PgPool,
        user_id: Option<DbId>,
        params: &BookingListQuery,
    ) -> Result<Vec<Booking>, RepoError> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        // Reject unknown status strings up front instead of silently
        // matching nothing.
        let status = match &params.status {
            Some(raw) => Some(BookingStatus::from_str(raw)?),
            None => None,
        };

        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if user_id.is_some() {
            conditions.push(format!("user_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Booking>(&query);
        if let Some(uid) = user_id {
            q = q.bind(uid);
        }
        if let Some(s) = status {
            q = q.bind(s.as_str());
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await.map_err(Into::into)
    }

    /// Aggregate booking counts and completed-booking revenue.
    pub async fn stats(pool: &PgPool) -> Result<BookingStats, sqlx::Error> {
        sqlx::query_as::<_, BookingStats>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'active') AS active, \
                    COUNT(*) FILTER (WHERE status = 'completed') AS completed, \
                    COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled, \
                    COALESCE(SUM(final_cost) FILTER (WHERE status = 'completed'), 0.0) \
                        AS total_revenue \
             FROM bookings",
        )
        .fetch_one(pool)
        .await
    }

    /// Latest snapshot helper used in tests and diagnostics: the active
    /// booking currently bound to a slot, if any.
    pub async fn active_on_slot(
        pool: &PgPool,
        slot_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE slot_id = $1 AND status = 'active' \
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(slot_id)
            .fetch_optional(pool)
            .await
    }
}
