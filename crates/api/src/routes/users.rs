use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Mount `/users` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}", get(users::get_by_id).delete(users::delete))
}
