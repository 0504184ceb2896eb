use axum::routing::get;
use axum::Router;

use crate::handlers::vehicles;
use crate::state::AppState;

/// Vehicle routes mounted at `/vehicles`.
///
/// ```text
/// GET    /                    -> list_vehicles
/// POST   /                    -> create_vehicle
/// GET    /decode-vin/{vin}    -> decode_vin
/// GET    /search              -> search_vehicles
/// GET    /{vin}               -> get_vehicle
/// PATCH  /{vin}               -> update_vehicle
/// DELETE /{vin}               -> delete_vehicle
/// GET    /{vin}/log           -> list_log
/// POST   /{vin}/log           -> append_log
/// GET    /{vin}/log/stats     -> log_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route("/decode-vin/{vin}", get(vehicles::decode_vin))
        .route("/search", get(vehicles::search_vehicles))
        .route(
            "/{vin}",
            get(vehicles::get_vehicle)
                .patch(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .route(
            "/{vin}/log",
            get(vehicles::list_log).post(vehicles::append_log),
        )
        .route("/{vin}/log/stats", get(vehicles::log_stats))
}
