use axum::extract::State;
use axum::{routing::get, Json, Router};
use carlog_core::health::HealthStatus;

use crate::state::AppState;

/// GET /health -- store reachability. Always 200; a store fault shows up as
/// `degraded` in the body, never as an error status.
async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let status = carlog_db::health_status(&state.pool).await;
    if !status.is_up() {
        tracing::warn!("Health check reports degraded service");
    }
    Json(status)
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
