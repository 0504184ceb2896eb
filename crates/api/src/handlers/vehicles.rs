//! Handlers for VIN decoding, stored vehicles, and their mileage logs.
//!
//! Every `{vin}` path segment is validated before the store is touched, so
//! malformed VINs fail with their specific error code rather than 404.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use carlog_core::decoder::{self, DecodedVehicle};
use carlog_core::mileage::{
    validate_date_range, validate_mileage, MileageStats, DEFAULT_STATS_DAYS, MAX_STATS_DAYS,
};
use carlog_core::vin::{self, Vin};
use carlog_db::models::log_entry::{CreateLogEntry, DateRange, LogEntry};
use carlog_db::models::vehicle::{CreateVehicle, VehicleMetadata};
use carlog_db::repositories::{LogEntryRepo, VehicleRepo};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

const VEHICLE: &str = "Vehicle";

/// Query parameters for `decode-vin`.
#[derive(Debug, Default, Deserialize)]
pub struct DecodeParams {
    /// Store the decoded vehicle; falls back to `SAVE_DECODED_VINS`.
    pub save: Option<bool>,
}

/// Pagination query parameters for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for the log listing: pagination plus inclusive date bounds.
#[derive(Debug, Default, Deserialize)]
pub struct LogListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Query parameters for log statistics.
///
/// `to` defaults to today and `from` to `days` before `to`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub days: Option<i64>,
}

/// Payload of `GET /vehicles/{vin}/log/stats`.
#[derive(Debug, Serialize)]
pub struct LogStats {
    pub vin: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(flatten)]
    pub stats: MileageStats,
}

/// Body of `GET /vehicles/{vin}/log`.
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub data: Vec<LogEntry>,
    pub count: usize,
    /// Highest reading on record, regardless of pagination.
    pub latest: Option<LogEntry>,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// GET /api/vehicles/decode-vin/{vin}
///
/// Validate and decode a VIN. With `?save=true` the result is also written
/// to the store; otherwise the store is never consulted.
pub async fn decode_vin(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    params: Result<Query<DecodeParams>, QueryRejection>,
) -> AppResult<Json<DecodedVehicle>> {
    let Query(params) = params?;
    let vin = vin::validate(&raw)?;
    let decoded = decoder::decode(&vin);

    if params.save.unwrap_or(state.config.save_decoded) {
        let record =
            VehicleRepo::upsert(&state.pool, &decoded, &VehicleMetadata::default()).await?;
        tracing::info!(
            vin = %vin,
            log_entries = record.log.len(),
            "Decoded VIN saved",
        );
    } else {
        tracing::debug!(vin = %vin, manufacturer = %decoded.manufacturer, "VIN decoded");
    }

    Ok(Json(decoded))
}

// ---------------------------------------------------------------------------
// Vehicles
// ---------------------------------------------------------------------------

/// GET /api/vehicles
pub async fn list_vehicles(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let vehicles = VehicleRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(ListResponse::new(vehicles)))
}

/// GET /api/vehicles/search?q=
///
/// Matches VIN prefixes and manufacturer or nickname substrings.
pub async fn search_vehicles(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::BadRequest("Search query is required".into()));
    }

    let vehicles = VehicleRepo::search(&state.pool, query, params.limit).await?;
    tracing::debug!(query, matches = vehicles.len(), "Vehicle search");
    Ok(Json(ListResponse::new(vehicles)))
}

/// POST /api/vehicles
///
/// Decode the VIN and store it with the supplied metadata. Saving a VIN
/// that is already stored refreshes its snapshot and keeps its log.
pub async fn create_vehicle(
    State(state): State<AppState>,
    body: Result<Json<CreateVehicle>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    let vin = vin::validate(&input.vin)?;
    input.validate()?;

    let decoded = decoder::decode(&vin);
    let record = VehicleRepo::upsert(&state.pool, &decoded, &input.metadata()).await?;

    tracing::info!(
        vin = %vin,
        manufacturer = %record.vehicle.manufacturer,
        "Vehicle saved",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/vehicles/{vin}
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> AppResult<impl IntoResponse> {
    let vin = vin::validate(&raw)?;
    let record = VehicleRepo::find_record(&state.pool, vin.as_str())
        .await?
        .ok_or_else(|| AppError::not_found(VEHICLE, vin.as_str()))?;
    Ok(Json(DataResponse { data: record }))
}

/// PATCH /api/vehicles/{vin}
///
/// Only the fields present in the body change.
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<VehicleMetadata>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let vin = vin::validate(&raw)?;
    let Json(input) = body?;
    input.validate()?;

    let record = VehicleRepo::update_metadata(&state.pool, vin.as_str(), &input)
        .await?
        .ok_or_else(|| AppError::not_found(VEHICLE, vin.as_str()))?;

    tracing::info!(vin = %vin, "Vehicle metadata updated");
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/vehicles/{vin}
///
/// Removes the vehicle and its whole log.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let vin = vin::validate(&raw)?;
    if !VehicleRepo::delete(&state.pool, vin.as_str()).await? {
        return Err(AppError::not_found(VEHICLE, vin.as_str()));
    }
    tracing::info!(vin = %vin, "Vehicle deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Mileage log
// ---------------------------------------------------------------------------

/// GET /api/vehicles/{vin}/log
pub async fn list_log(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    params: Result<Query<LogListParams>, QueryRejection>,
) -> AppResult<Json<LogListResponse>> {
    let vin = vin::validate(&raw)?;
    let Query(params) = params?;
    validate_date_range(params.from, params.to)?;
    ensure_vehicle(&state, &vin).await?;

    let range = DateRange::new(params.from, params.to);
    let entries = LogEntryRepo::list_by_vin(
        &state.pool,
        vin.as_str(),
        range,
        params.limit,
        params.offset,
    )
    .await?;
    let latest = LogEntryRepo::latest(&state.pool, vin.as_str()).await?;

    Ok(Json(LogListResponse {
        count: entries.len(),
        data: entries,
        latest,
    }))
}

/// GET /api/vehicles/{vin}/log/stats
///
/// Distance, days tracked, and daily and yearly averages over a window of
/// the log.
pub async fn log_stats(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let vin = vin::validate(&raw)?;
    let Query(params) = params?;
    let (from, to) = stats_window(&params, Utc::now().date_naive())?;
    ensure_vehicle(&state, &vin).await?;

    let stats =
        LogEntryRepo::stats(&state.pool, vin.as_str(), DateRange::new(Some(from), Some(to)))
            .await?;

    Ok(Json(DataResponse {
        data: LogStats {
            vin: vin.as_str().to_string(),
            from,
            to,
            stats,
        },
    }))
}

/// POST /api/vehicles/{vin}/log
pub async fn append_log(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<CreateLogEntry>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let vin = vin::validate(&raw)?;
    let Json(input) = body?;
    input.validate()?;
    validate_mileage(input.mileage)?;

    let entry = LogEntryRepo::append(&state.pool, vin.as_str(), &input)
        .await?
        .ok_or_else(|| AppError::not_found(VEHICLE, vin.as_str()))?;

    tracing::info!(
        vin = %vin,
        seq = entry.seq,
        mileage = entry.mileage,
        "Mileage recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

async fn ensure_vehicle(state: &AppState, vin: &Vin) -> AppResult<()> {
    match VehicleRepo::find_by_vin(&state.pool, vin.as_str()).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(VEHICLE, vin.as_str())),
    }
}

/// Resolve the inclusive window for log statistics.
fn stats_window(params: &StatsParams, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let to = params.to.unwrap_or(today);
    let from = match params.from {
        Some(from) => from,
        None => {
            let days = params.days.unwrap_or(DEFAULT_STATS_DAYS).clamp(1, MAX_STATS_DAYS);
            to.checked_sub_days(Days::new(days.unsigned_abs()))
                .unwrap_or(NaiveDate::MIN)
        }
    };
    validate_date_range(Some(from), Some(to))?;
    Ok((from, to))
}
