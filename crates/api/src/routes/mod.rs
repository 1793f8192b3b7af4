pub mod bookings;
pub mod health;
pub mod lots;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /parking-lots                    list (with occupancy), create
/// /parking-lots/{id}               get, update (incl. resize), delete
/// /parking-lots/{id}/slots         slot board with live snapshots
/// /parking-lots/{id}/occupancy     total/available/occupied counts
///
/// /bookings                        admin list (GET), book a slot (POST)
/// /bookings/release                release an active booking (POST)
/// /bookings/stats                  counts by status + revenue (admin)
/// /my-bookings                     the caller's bookings
///
/// /users                           list, create
/// /users/{id}                      get, delete (force-releases holdings)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/parking-lots", lots::router())
        .nest("/bookings", bookings::router())
        .route("/my-bookings", get(handlers::bookings::list_mine))
        .nest("/users", users::router())
}
