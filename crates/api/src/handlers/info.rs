//! Static service descriptions for `/` and `/api`.

use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "CarLog API";

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const fn endpoint(
    method: &'static str,
    path: &'static str,
    description: &'static str,
) -> EndpointInfo {
    EndpointInfo {
        method,
        path,
        description,
    }
}

fn vehicle_endpoints() -> Vec<EndpointInfo> {
    vec![
        endpoint(
            "GET",
            "/api/vehicles/decode-vin/{vin}",
            "Validate and decode a VIN; ?save=true stores it",
        ),
        endpoint("GET", "/api/vehicles", "List stored vehicles"),
        endpoint(
            "GET",
            "/api/vehicles/search?q=",
            "Search by VIN prefix, manufacturer or nickname",
        ),
        endpoint("POST", "/api/vehicles", "Store a vehicle from its VIN"),
        endpoint("GET", "/api/vehicles/{vin}", "Fetch a stored vehicle"),
        endpoint("PATCH", "/api/vehicles/{vin}", "Update nickname or notes"),
        endpoint("DELETE", "/api/vehicles/{vin}", "Delete a vehicle and its log"),
        endpoint(
            "GET",
            "/api/vehicles/{vin}/log",
            "List mileage readings; ?from=&to= bound the dates",
        ),
        endpoint("POST", "/api/vehicles/{vin}/log", "Record a mileage reading"),
        endpoint(
            "GET",
            "/api/vehicles/{vin}/log/stats",
            "Average daily and estimated yearly miles",
        ),
    ]
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    let mut endpoints = vec![
        endpoint("GET", "/health", "Service and store health"),
        endpoint("GET", "/api", "API description"),
    ];
    endpoints.extend(vehicle_endpoints());

    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints,
    })
}

/// GET /api
pub async fn api_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: vehicle_endpoints(),
    })
}
