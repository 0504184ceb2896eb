//! Mileage reading rules and usage statistics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;

/// Highest odometer reading accepted, in miles.
pub const MAX_MILEAGE: i64 = 2_000_000;

/// Source recorded when a log entry does not name one.
pub const DEFAULT_SOURCE: &str = "manual";

/// Days of history covered by usage statistics when no start date is given.
pub const DEFAULT_STATS_DAYS: i64 = 30;

/// Longest look-back accepted for usage statistics.
pub const MAX_STATS_DAYS: i64 = 3650;

/// Validate that an odometer reading falls within `[0, MAX_MILEAGE]`.
pub fn validate_mileage(mileage: i64) -> Result<(), CoreError> {
    if !(0..=MAX_MILEAGE).contains(&mileage) {
        return Err(CoreError::Validation(format!(
            "mileage must be between 0 and {MAX_MILEAGE}, got {mileage}"
        )));
    }
    Ok(())
}

/// Validate an inclusive date window. Either bound may be open.
pub fn validate_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), CoreError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(CoreError::Validation(format!(
            "date range start {from} is after its end {to}"
        ))),
        _ => Ok(()),
    }
}

/// Driving summary over a window of log entries.
///
/// Distance is the spread between the lowest and highest reading, and time
/// is the spread between the first and last reading date. Fewer than two
/// readings carry no distance, so the averages stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MileageStats {
    pub readings: i64,
    pub total_miles: i64,
    pub days_tracked: i64,
    /// Rounded to one decimal place.
    pub average_daily_miles: Option<f64>,
    pub estimated_yearly_miles: Option<i64>,
}

impl MileageStats {
    /// Build the summary from the aggregates of a window (`COUNT`, `MIN` and
    /// `MAX` of mileage, `MIN` and `MAX` of the reading date).
    pub fn from_aggregate(
        readings: i64,
        lowest: Option<i64>,
        highest: Option<i64>,
        first_on: Option<NaiveDate>,
        last_on: Option<NaiveDate>,
    ) -> Self {
        let (Some(lowest), Some(highest), Some(first_on), Some(last_on)) =
            (lowest, highest, first_on, last_on)
        else {
            return Self::insufficient(readings);
        };
        if readings < 2 {
            return Self::insufficient(readings);
        }

        let total_miles = highest - lowest;
        // Readings on a single day still count as one day of driving.
        let days_tracked = (last_on - first_on).num_days().max(1);
        let daily = total_miles as f64 / days_tracked as f64;

        Self {
            readings,
            total_miles,
            days_tracked,
            average_daily_miles: Some((daily * 10.0).round() / 10.0),
            estimated_yearly_miles: Some((daily * 365.0).round() as i64),
        }
    }

    fn insufficient(readings: i64) -> Self {
        Self {
            readings,
            total_miles: 0,
            days_tracked: 0,
            average_daily_miles: None,
            estimated_yearly_miles: None,
        }
    }

    /// Whether there were enough readings to compute averages.
    pub fn has_averages(&self) -> bool {
        self.average_daily_miles.is_some()
    }
}
