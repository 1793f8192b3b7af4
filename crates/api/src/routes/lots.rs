use axum::routing::get;
use axum::Router;

use crate::handlers::lots;
use crate::state::AppState;

/// Mount `/parking-lots` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lots::list).post(lots::create))
        .route(
            "/{id}",
            get(lots::get_by_id).put(lots::update).delete(lots::delete),
        )
        .route("/{id}/slots", get(lots::slots))
        .route("/{id}/occupancy", get(lots::occupancy))
}
