//! Mileage log entry models and DTOs.

use carlog_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A `vehicle_log_entries` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogEntry {
    pub id: DbId,
    pub vin: String,
    /// 1-based position within the vehicle's log.
    pub seq: i64,
    pub mileage: i64,
    pub recorded_on: NaiveDate,
    pub source: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Input for appending a log entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLogEntry {
    pub mileage: i64,
    /// Defaults to today (UTC).
    pub recorded_on: Option<NaiveDate>,
    /// Defaults to `"manual"`.
    #[validate(length(min = 1, max = 50))]
    pub source: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Inclusive date bounds for log queries. Absent bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }
}
