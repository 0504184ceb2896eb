use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Vehicle store connection pool.
    pub pool: carlog_db::DbPool,
    /// Server configuration, built once at startup.
    pub config: Arc<ServerConfig>,
}
