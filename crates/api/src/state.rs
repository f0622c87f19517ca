use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wishlist_db::DbPool,
    /// Server configuration (read by the auth extractors and token issuer).
    pub config: Arc<ServerConfig>,
}
