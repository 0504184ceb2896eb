//! Repository for the `vehicle_log_entries` table.

use carlog_core::mileage::{MileageStats, DEFAULT_SOURCE};
use carlog_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT};
use chrono::NaiveDate;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::models::log_entry::{CreateLogEntry, DateRange, LogEntry};

/// Column list for `vehicle_log_entries` queries.
const COLUMNS: &str = "id, vin, seq, mileage, recorded_on, source, notes, created_at";

/// Aggregates over a window of one vehicle's log.
#[derive(Debug, FromRow)]
struct StatsRow {
    readings: i64,
    lowest: Option<i64>,
    highest: Option<i64>,
    first_on: Option<NaiveDate>,
    last_on: Option<NaiveDate>,
}

/// Provides append and query operations for vehicle logs.
pub struct LogEntryRepo;

impl LogEntryRepo {
    /// Append an entry to a vehicle's log.
    ///
    /// The next `seq` is computed and the row inserted by a single
    /// statement, so concurrent appends to one VIN are ordered by SQLite's
    /// write lock and `uq_vehicle_log_entries_vin_seq` rejects any gap or
    /// duplicate. The vehicle's `current_mileage` is raised in the same
    /// transaction when the reading is higher. Returns `None` if the VIN
    /// has no vehicle row.
    pub async fn append(
        pool: &SqlitePool,
        vin: &str,
        input: &CreateLogEntry,
    ) -> Result<Option<LogEntry>, sqlx::Error> {
        let now = chrono::Utc::now();
        let recorded_on = input.recorded_on.unwrap_or_else(|| now.date_naive());
        let source = input.source.as_deref().unwrap_or(DEFAULT_SOURCE);

        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO vehicle_log_entries \
                 (vin, seq, mileage, recorded_on, source, notes, created_at) \
             SELECT v.vin, \
                    (SELECT COALESCE(MAX(e.seq), 0) + 1 \
                     FROM vehicle_log_entries e WHERE e.vin = v.vin), \
                    ?2, ?3, ?4, ?5, ?6 \
             FROM vehicles v WHERE v.vin = ?1 \
             RETURNING {COLUMNS}"
        );
        let Some(entry) = sqlx::query_as::<_, LogEntry>(&insert_query)
            .bind(vin)
            .bind(input.mileage)
            .bind(recorded_on)
            .bind(source)
            .bind(&input.notes)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE vehicles SET \
                 current_mileage = MAX(COALESCE(current_mileage, 0), ?2), \
                 updated_at = ?3 \
             WHERE vin = ?1",
        )
        .bind(vin)
        .bind(entry.mileage)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }

    /// List a vehicle's log entries within `range`, most recent reading first.
    pub async fn list_by_vin(
        pool: &SqlitePool,
        vin: &str,
        range: DateRange,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let limit_val = clamp_limit(limit, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT);
        let offset_val = clamp_offset(offset);

        let query = format!(
            "SELECT {COLUMNS} FROM vehicle_log_entries \
             WHERE vin = ?1 \
               AND (?2 IS NULL OR recorded_on >= ?2) \
               AND (?3 IS NULL OR recorded_on <= ?3) \
             ORDER BY recorded_on DESC, seq DESC \
             LIMIT ?4 OFFSET ?5"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(vin)
            .bind(range.from)
            .bind(range.to)
            .bind(limit_val)
            .bind(offset_val)
            .fetch_all(pool)
            .await
    }

    /// Driving statistics over the entries within `range`, from a single
    /// aggregate query.
    pub async fn stats(
        pool: &SqlitePool,
        vin: &str,
        range: DateRange,
    ) -> Result<MileageStats, sqlx::Error> {
        let row = sqlx::query_as::<_, StatsRow>(
            "SELECT COUNT(*) AS readings, \
                    MIN(mileage) AS lowest, \
                    MAX(mileage) AS highest, \
                    MIN(recorded_on) AS first_on, \
                    MAX(recorded_on) AS last_on \
             FROM vehicle_log_entries \
             WHERE vin = ?1 \
               AND (?2 IS NULL OR recorded_on >= ?2) \
               AND (?3 IS NULL OR recorded_on <= ?3)",
        )
        .bind(vin)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(pool)
        .await?;

        Ok(MileageStats::from_aggregate(
            row.readings,
            row.lowest,
            row.highest,
            row.first_on,
            row.last_on,
        ))
    }

    /// The entry with the highest mileage for a vehicle, if any.
    pub async fn latest(pool: &SqlitePool, vin: &str) -> Result<Option<LogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicle_log_entries \
             WHERE vin = ?1 \
             ORDER BY mileage DESC, seq DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(vin)
            .fetch_optional(pool)
            .await
    }

    /// Every entry for a vehicle in append order.
    pub(crate) async fn list_ordered_inner(
        conn: &mut SqliteConnection,
        vin: &str,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicle_log_entries \
             WHERE vin = ?1 \
             ORDER BY seq ASC"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(vin)
            .fetch_all(conn)
            .await
    }
}
