pub mod health;
pub mod root;
pub mod vehicles;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /                                   API info (GET)
/// /vehicles                           list, create
/// /vehicles/decode-vin/{vin}          validate and decode (GET, ?save=true)
/// /vehicles/{vin}                     get, patch metadata, delete
/// /vehicles/{vin}/log                 list, append mileage readings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::info::api_info))
        .nest("/vehicles", vehicles::router())
}
