//! Vehicle record models and DTOs.

use carlog_core::decoder::DecodedVehicle;
use carlog_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use crate::models::log_entry::LogEntry;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A `vehicles` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub vin: String,
    /// Decoder output captured when the row was last written.
    pub decoded: Json<DecodedVehicle>,
    pub decoder_version: i64,
    pub manufacturer: String,
    pub model_year: Option<i64>,
    pub nickname: Option<String>,
    pub notes: Option<String>,
    /// Highest odometer reading logged so far.
    pub current_mileage: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A vehicle together with its full log, oldest entry first.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRecord {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub log: Vec<LogEntry>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// User-supplied metadata. Absent fields leave stored values untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VehicleMetadata {
    #[validate(length(min = 1, max = 100))]
    pub nickname: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Request body for creating (or re-saving) a vehicle from its VIN.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicle {
    pub vin: String,
    #[validate(length(min = 1, max = 100))]
    pub nickname: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl CreateVehicle {
    pub fn metadata(&self) -> VehicleMetadata {
        VehicleMetadata {
            nickname: self.nickname.clone(),
            notes: self.notes.clone(),
        }
    }
}
