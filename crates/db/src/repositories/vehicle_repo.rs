//! Repository for the `vehicles` table.

use carlog_core::decoder::DecodedVehicle;
use carlog_core::pagination::{
    clamp_limit, clamp_offset, DEFAULT_SEARCH_LIMIT, DEFAULT_VEHICLE_LIMIT, MAX_SEARCH_LIMIT,
    MAX_VEHICLE_LIMIT,
};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::vehicle::{Vehicle, VehicleMetadata, VehicleRecord};
use crate::repositories::LogEntryRepo;

/// Column list for `vehicles` queries.
const COLUMNS: &str = "\
    vin, decoded, decoder_version, manufacturer, model_year, \
    nickname, notes, current_mileage, created_at, updated_at";

/// Provides keyed access to vehicle records.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Find a vehicle row by VIN, without its log.
    pub async fn find_by_vin(pool: &SqlitePool, vin: &str) -> Result<Option<Vehicle>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_by_vin_inner(&mut conn, vin).await
    }

    /// Find a vehicle and its full log.
    ///
    /// Both reads run in one transaction so the log matches the row.
    pub async fn find_record(
        pool: &SqlitePool,
        vin: &str,
    ) -> Result<Option<VehicleRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(vehicle) = Self::find_by_vin_inner(&mut tx, vin).await? else {
            return Ok(None);
        };
        let log = LogEntryRepo::list_ordered_inner(&mut tx, vin).await?;
        tx.commit().await?;
        Ok(Some(VehicleRecord { vehicle, log }))
    }

    /// List vehicles ordered by manufacturer, newest model year first.
    pub async fn list(
        pool: &SqlitePool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Vehicle>, sqlx::Error> {
        let limit_val = clamp_limit(limit, DEFAULT_VEHICLE_LIMIT, MAX_VEHICLE_LIMIT);
        let offset_val = clamp_offset(offset);

        let query = format!(
            "SELECT {COLUMNS} FROM vehicles \
             ORDER BY manufacturer ASC, model_year DESC, vin ASC \
             LIMIT ?1 OFFSET ?2"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(limit_val)
            .bind(offset_val)
            .fetch_all(pool)
            .await
    }

    /// Find vehicles whose VIN starts with `query`, or whose manufacturer or
    /// nickname contains it. Matching ignores ASCII case and treats `%` and
    /// `_` literally.
    pub async fn search(
        pool: &SqlitePool,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Vehicle>, sqlx::Error> {
        let limit_val = clamp_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        let needle = escape_like(query.trim());

        let sql = format!(
            "SELECT {COLUMNS} FROM vehicles \
             WHERE vin LIKE ?1 ESCAPE '\\' \
                OR manufacturer LIKE ?2 ESCAPE '\\' \
                OR nickname LIKE ?2 ESCAPE '\\' \
             ORDER BY model_year DESC, manufacturer ASC, vin ASC \
             LIMIT ?3"
        );
        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(format!("{}%", needle.to_ascii_uppercase()))
            .bind(format!("%{needle}%"))
            .bind(limit_val)
            .fetch_all(pool)
            .await
    }

    /// Insert a vehicle, or refresh an existing one.
    ///
    /// On conflict the decoded snapshot is always replaced, while nickname
    /// and notes only change when `metadata` supplies them (falls back to
    /// existing values via `COALESCE`). `created_at` is never touched.
    pub async fn upsert(
        pool: &SqlitePool,
        decoded: &DecodedVehicle,
        metadata: &VehicleMetadata,
    ) -> Result<VehicleRecord, sqlx::Error> {
        let now = chrono::Utc::now();
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO vehicles \
                 (vin, decoded, decoder_version, manufacturer, model_year, \
                  nickname, notes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) \
             ON CONFLICT (vin) DO UPDATE SET \
                 decoded = excluded.decoded, \
                 decoder_version = excluded.decoder_version, \
                 manufacturer = excluded.manufacturer, \
                 model_year = excluded.model_year, \
                 nickname = COALESCE(excluded.nickname, vehicles.nickname), \
                 notes = COALESCE(excluded.notes, vehicles.notes), \
                 updated_at = excluded.updated_at \
             RETURNING {COLUMNS}"
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(decoded.vin.as_str())
            .bind(Json(decoded))
            .bind(decoded.decoder_version)
            .bind(&decoded.manufacturer)
            .bind(decoded.model_year)
            .bind(&metadata.nickname)
            .bind(&metadata.notes)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let log = LogEntryRepo::list_ordered_inner(&mut tx, &vehicle.vin).await?;
        tx.commit().await?;
        Ok(VehicleRecord { vehicle, log })
    }

    /// Merge metadata into an existing vehicle. Returns `None` if not found.
    pub async fn update_metadata(
        pool: &SqlitePool,
        vin: &str,
        metadata: &VehicleMetadata,
    ) -> Result<Option<VehicleRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE vehicles SET \
                 nickname = COALESCE(?2, nickname), \
                 notes = COALESCE(?3, notes), \
                 updated_at = ?4 \
             WHERE vin = ?1 \
             RETURNING {COLUMNS}"
        );
        let Some(vehicle) = sqlx::query_as::<_, Vehicle>(&query)
            .bind(vin)
            .bind(&metadata.nickname)
            .bind(&metadata.notes)
            .bind(chrono::Utc::now())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let log = LogEntryRepo::list_ordered_inner(&mut tx, vin).await?;
        tx.commit().await?;
        Ok(Some(VehicleRecord { vehicle, log }))
    }

    /// Delete a vehicle and, by cascade, its log. Returns `true` if a row was deleted.
    pub async fn delete(pool: &SqlitePool, vin: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE vin = ?1")
            .bind(vin)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_vin_inner(
        conn: &mut SqliteConnection,
        vin: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE vin = ?1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(vin)
            .fetch_optional(conn)
            .await
    }
}

/// Escape `LIKE` wildcards so user input matches literally under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
