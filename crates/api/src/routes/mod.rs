pub mod auth;
pub mod health;
pub mod progress;
pub mod wish;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
/// /auth/me                        own account (requires auth)
///
/// /wishes                         list (any role), create (wisher)
/// /wishes/{id}                    get (any role), update (owner), delete (owner or partner)
/// /wishes/{id}/status             owner toggle (PUT)
///
/// /progress                       partner overview (GET)
/// /progress/{wish_id}/will-do     secret transition (PUT)
/// /progress/{wish_id}/in-progress secret transition (PUT)
/// /progress/{wish_id}/done        secret transition (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/wishes", wish::router())
        .nest("/progress", progress::router())
}
