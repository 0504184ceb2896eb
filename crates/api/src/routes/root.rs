use axum::{routing::get, Router};

use crate::handlers::info;
use crate::state::AppState;

/// Mount the service info route at `/`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(info::service_info))
}
