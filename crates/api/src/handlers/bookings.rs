//! Handlers for the `/bookings` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkwise_core::error::CoreError;
use parkwise_db::models::booking::{
    BookSlot, Booking, BookingListQuery, BookingStats, ReleaseReceipt, ReleaseSlot,
};
use parkwise_db::repositories::BookingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.role != "admin" {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin access required".to_string(),
        )));
    }
    Ok(())
}

/// POST /api/v1/bookings
///
/// Reserve a slot for the authenticated user. The lot's current rate is
/// captured into the booking at this point.
pub async fn book(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BookSlot>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = BookingRepo::book(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// POST /api/v1/bookings/release
///
/// Release an active booking owned by the authenticated user, by booking
/// code or by slot. Returns the finalized receipt.
pub async fn release(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ReleaseSlot>,
) -> AppResult<Json<ReleaseReceipt>> {
    let receipt = BookingRepo::release(&state.pool, user.user_id, &input).await?;
    Ok(Json(receipt))
}

/// GET /api/v1/bookings
///
/// Admin-wide booking listing with optional status filter and pagination.
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    require_admin(&user)?;
    let bookings = BookingRepo::list_all(&state.pool, &params).await?;
    Ok(Json(bookings))
}

/// GET /api/v1/my-bookings
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = BookingRepo::list_by_user(&state.pool, user.user_id, &params).await?;
    Ok(Json(bookings))
}

/// GET /api/v1/bookings/stats
///
/// Counts by status plus total revenue over completed bookings.
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<BookingStats>> {
    require_admin(&user)?;
    let stats = BookingRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}
