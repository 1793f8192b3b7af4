use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Mount `/bookings` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::list_all).post(bookings::book))
        .route("/release", post(bookings::release))
        .route("/stats", get(bookings::stats))
}
