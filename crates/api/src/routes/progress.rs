//! Route definitions for the partner-only `/progress` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET /                        -> list
/// PUT /{wish_id}/will-do       -> will_do
/// PUT /{wish_id}/in-progress   -> in_progress
/// PUT /{wish_id}/done          -> done
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(progress::list))
        .route("/{wish_id}/will-do", put(progress::will_do))
        .route("/{wish_id}/in-progress", put(progress::in_progress))
        .route("/{wish_id}/done", put(progress::done))
}
