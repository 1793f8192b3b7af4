//! Handlers for the `/parking-lots` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkwise_core::error::CoreError;
use parkwise_core::types::DbId;
use parkwise_db::models::lot::{CreateLot, Lot, LotOccupancy, LotResize, LotWithOccupancy, UpdateLot};
use parkwise_db::models::slot::SlotView;
use parkwise_db::repositories::{LotRepo, SlotRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/parking-lots
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateLot>,
) -> AppResult<(StatusCode, Json<Lot>)> {
    let lot = LotRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// GET /api/v1/parking-lots
///
/// Every lot with its live occupancy counts.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<LotWithOccupancy>>> {
    let lots = LotRepo::list_with_occupancy(&state.pool).await?;
    Ok(Json(lots))
}

/// GET /api/v1/parking-lots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lot>> {
    let lot = LotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Parking lot",
            id,
        }))?;
    Ok(Json(lot))
}

/// PUT /api/v1/parking-lots/{id}
///
/// Partial update, including resizing the slot range. A shrink blocked by
/// occupied slots reports the overflow count in the response instead of
/// silently reconciling it.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLot>,
) -> AppResult<Json<LotResize>> {
    let resized = LotRepo::update(&state.pool, id, &input).await?;
    Ok(Json(resized))
}

/// DELETE /api/v1/parking-lots/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    LotRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/parking-lots/{id}/slots
///
/// The slot board: occupied slots carry a live snapshot (current duration
/// and running cost) derived at read time, never persisted.
pub async fn slots(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<SlotView>>> {
    let board = SlotRepo::board_for_lot(&state.pool, id).await?;
    Ok(Json(board))
}

/// GET /api/v1/parking-lots/{id}/occupancy
pub async fn occupancy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<LotOccupancy>> {
    let counts = LotRepo::occupancy(&state.pool, id).await?;
    Ok(Json(counts))
}
