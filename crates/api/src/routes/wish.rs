//! Route definitions for the `/wishes` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::wish;
use crate::state::AppState;

/// Routes mounted at `/wishes`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// PUT    /{id}/status  -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wish::list).post(wish::create))
        .route(
            "/{id}",
            get(wish::get_by_id).put(wish::update).delete(wish::delete),
        )
        .route("/{id}/status", put(wish::set_status))
}
