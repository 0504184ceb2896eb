//! Integration tests for the vehicle store against real SQLite databases.
//!
//! Most tests use a private in-memory database; the durability and
//! concurrency tests use a file in a temporary directory.

use assert_matches::assert_matches;
use carlog_core::decoder::{decode, decode_for_year};
use carlog_core::health::{DatabaseStatus, ServiceStatus};
use carlog_core::vin::{validate, Vin};
use carlog_db::models::log_entry::{CreateLogEntry, DateRange, LogEntry};
use carlog_db::models::vehicle::VehicleMetadata;
use carlog_db::repositories::{LogEntryRepo, VehicleRepo};
use chrono::NaiveDate;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HONDA: &str = "1HGCM82633A004352";
const ACURA: &str = "JH4KA7561PC008269";

async fn memory_pool() -> SqlitePool {
    let pool = carlog_db::create_pool("sqlite::memory:", 1).await.unwrap();
    carlog_db::run_migrations(&pool).await.unwrap();
    pool
}

async fn file_pool(dir: &tempfile::TempDir, max_connections: u32) -> SqlitePool {
    let url = format!("sqlite://{}", dir.path().join("carlog.db").display());
    let pool = carlog_db::create_pool(&url, max_connections).await.unwrap();
    carlog_db::run_migrations(&pool).await.unwrap();
    pool
}

fn vin(raw: &str) -> Vin {
    validate(raw).unwrap()
}

fn metadata(nickname: Option<&str>, notes: Option<&str>) -> VehicleMetadata {
    VehicleMetadata {
        nickname: nickname.map(str::to_string),
        notes: notes.map(str::to_string),
    }
}

fn reading(mileage: i64) -> CreateLogEntry {
    CreateLogEntry {
        mileage,
        recorded_on: None,
        source: None,
        notes: None,
    }
}

fn reading_on(mileage: i64, date: &str) -> CreateLogEntry {
    CreateLogEntry {
        recorded_on: Some(day(date)),
        ..reading(mileage)
    }
}

fn day(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

fn range(from: Option<&str>, to: Option<&str>) -> DateRange {
    DateRange::new(from.map(day), to.map(day))
}

async fn seed_fleet(pool: &SqlitePool) {
    for raw in [HONDA, "WBA3A5C53CF256551", ACURA, "5YJSA1E18HF000001"] {
        VehicleRepo::upsert(pool, &decode(&vin(raw)), &VehicleMetadata::default())
            .await
            .unwrap();
    }
}

async fn seed_quarter(pool: &SqlitePool) {
    VehicleRepo::upsert(pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();
    for (mileage, date) in [(1000, "2026-01-01"), (1300, "2026-01-16"), (1600, "2026-01-31")] {
        LogEntryRepo::append(pool, HONDA, &reading_on(mileage, date))
            .await
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_status_is_up_for_open_pool() {
    let pool = memory_pool().await;
    let status = carlog_db::health_status(&pool).await;
    assert_eq!(status.status, ServiceStatus::Healthy);
    assert_eq!(status.database, DatabaseStatus::Connected);
}

#[tokio::test]
async fn health_status_is_down_after_pool_is_closed() {
    let pool = memory_pool().await;
    pool.close().await;

    let status = carlog_db::health_status(&pool).await;
    assert_eq!(status.status, ServiceStatus::Degraded);
    assert_eq!(status.database, DatabaseStatus::Unreachable);
    assert!(carlog_db::health_check(&pool).await.is_err());
}

// ---------------------------------------------------------------------------
// Upsert / get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_missing_vin_returns_none() {
    let pool = memory_pool().await;
    assert!(VehicleRepo::find_record(&pool, HONDA).await.unwrap().is_none());
    assert!(VehicleRepo::find_by_vin(&pool, HONDA).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_creates_record_with_snapshot() {
    let pool = memory_pool().await;
    let decoded = decode(&vin(HONDA));

    let record = VehicleRepo::upsert(&pool, &decoded, &metadata(Some("Daily"), None))
        .await
        .unwrap();

    assert_eq!(record.vehicle.vin, HONDA);
    assert_eq!(record.vehicle.decoded.0, decoded);
    assert_eq!(record.vehicle.manufacturer, "Honda");
    assert_eq!(record.vehicle.model_year, Some(2003));
    assert_eq!(record.vehicle.nickname.as_deref(), Some("Daily"));
    assert_eq!(record.vehicle.current_mileage, None);
    assert!(record.log.is_empty());

    let fetched = VehicleRepo::find_record(&pool, HONDA).await.unwrap().unwrap();
    assert_eq!(fetched.vehicle.decoded.0, decoded);
    assert_eq!(fetched.vehicle.created_at, record.vehicle.created_at);
}

#[tokio::test]
async fn re_upsert_refreshes_snapshot_and_preserves_metadata() {
    let pool = memory_pool().await;
    let acura = vin(ACURA);

    let first = VehicleRepo::upsert(
        &pool,
        &decode_for_year(&acura, 2022),
        &metadata(Some("Legend"), Some("garage kept")),
    )
    .await
    .unwrap();
    assert_eq!(first.vehicle.model_year, Some(1993));

    let second = VehicleRepo::upsert(&pool, &decode_for_year(&acura, 2026), &VehicleMetadata::default())
        .await
        .unwrap();

    assert_eq!(second.vehicle.model_year, Some(2023));
    assert_eq!(second.vehicle.decoded.0.model_year, Some(2023));
    assert_eq!(second.vehicle.nickname.as_deref(), Some("Legend"));
    assert_eq!(second.vehicle.notes.as_deref(), Some("garage kept"));
    assert_eq!(second.vehicle.created_at, first.vehicle.created_at);
    assert!(second.vehicle.updated_at >= first.vehicle.updated_at);
}

#[tokio::test]
async fn re_upsert_with_metadata_overwrites_only_supplied_fields() {
    let pool = memory_pool().await;
    let decoded = decode(&vin(HONDA));

    VehicleRepo::upsert(&pool, &decoded, &metadata(Some("Old"), Some("keep me")))
        .await
        .unwrap();
    let record = VehicleRepo::upsert(&pool, &decoded, &metadata(Some("New"), None))
        .await
        .unwrap();

    assert_eq!(record.vehicle.nickname.as_deref(), Some("New"));
    assert_eq!(record.vehicle.notes.as_deref(), Some("keep me"));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1, "VIN must stay unique");
}

#[tokio::test]
async fn update_metadata_merges_and_reports_missing() {
    let pool = memory_pool().await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &metadata(Some("Civic"), None))
        .await
        .unwrap();

    let updated = VehicleRepo::update_metadata(&pool, HONDA, &metadata(None, Some("new tyres")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.vehicle.nickname.as_deref(), Some("Civic"));
    assert_eq!(updated.vehicle.notes.as_deref(), Some("new tyres"));

    let missing = VehicleRepo::update_metadata(&pool, ACURA, &metadata(Some("x"), None))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn list_orders_by_manufacturer_and_paginates() {
    let pool = memory_pool().await;
    seed_fleet(&pool).await;

    let all = VehicleRepo::list(&pool, None, None).await.unwrap();
    let makers: Vec<&str> = all.iter().map(|v| v.manufacturer.as_str()).collect();
    assert_eq!(makers, ["Acura", "BMW", "Honda", "Tesla"]);

    let page = VehicleRepo::list(&pool, Some(2), Some(1)).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].manufacturer, "BMW");
    assert_eq!(page[1].manufacturer, "Honda");
}

#[tokio::test]
async fn search_matches_vin_prefix_ignoring_case() {
    let pool = memory_pool().await;
    seed_fleet(&pool).await;

    let found = VehicleRepo::search(&pool, "1hgcm", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vin, HONDA);

    // Only the start of the VIN is matched.
    let found = VehicleRepo::search(&pool, "A004352", None).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn search_matches_manufacturer_and_nickname_substrings() {
    let pool = memory_pool().await;
    seed_fleet(&pool).await;
    VehicleRepo::update_metadata(&pool, ACURA, &metadata(Some("Weekend toy"), None))
        .await
        .unwrap();

    let found = VehicleRepo::search(&pool, "bmw", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].manufacturer, "BMW");

    let found = VehicleRepo::search(&pool, "ESL", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].manufacturer, "Tesla");

    let found = VehicleRepo::search(&pool, "weekend", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vin, ACURA);
}

#[tokio::test]
async fn search_treats_wildcards_literally_and_honors_limit() {
    let pool = memory_pool().await;
    seed_fleet(&pool).await;
    VehicleRepo::update_metadata(&pool, HONDA, &metadata(Some("100% reliable"), None))
        .await
        .unwrap();

    let found = VehicleRepo::search(&pool, "%", None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vin, HONDA);
    assert!(VehicleRepo::search(&pool, "_", None).await.unwrap().is_empty());

    // "a" appears in Acura, Honda and Tesla.
    assert_eq!(VehicleRepo::search(&pool, "a", None).await.unwrap().len(), 3);
    assert_eq!(VehicleRepo::search(&pool, "a", Some(2)).await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Log entries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn append_to_unknown_vin_returns_none() {
    let pool = memory_pool().await;
    let result = LogEntryRepo::append(&pool, HONDA, &reading(1000)).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn append_after_upsert_grows_log_by_one() {
    let pool = memory_pool().await;
    assert!(LogEntryRepo::append(&pool, HONDA, &reading(1000))
        .await
        .unwrap()
        .is_none());

    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();
    let before = VehicleRepo::find_record(&pool, HONDA).await.unwrap().unwrap();

    let entry = LogEntryRepo::append(&pool, HONDA, &reading(1000))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.seq, 1);
    assert_eq!(entry.source, "manual");

    let after = VehicleRepo::find_record(&pool, HONDA).await.unwrap().unwrap();
    assert_eq!(after.log.len(), before.log.len() + 1);
    assert_eq!(after.log[0].id, entry.id);
}

#[tokio::test]
async fn current_mileage_tracks_highest_reading() {
    let pool = memory_pool().await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();

    LogEntryRepo::append(&pool, HONDA, &reading(5000)).await.unwrap();
    LogEntryRepo::append(&pool, HONDA, &reading(1200)).await.unwrap();

    let vehicle = VehicleRepo::find_by_vin(&pool, HONDA).await.unwrap().unwrap();
    assert_eq!(vehicle.current_mileage, Some(5000));

    let latest = LogEntryRepo::latest(&pool, HONDA).await.unwrap().unwrap();
    assert_eq!(latest.mileage, 5000);
    assert_eq!(latest.seq, 1);
}

#[tokio::test]
async fn log_listing_is_newest_first_and_record_log_is_append_order() {
    let pool = memory_pool().await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();

    LogEntryRepo::append(&pool, HONDA, &reading_on(3000, "2026-03-01"))
        .await
        .unwrap();
    LogEntryRepo::append(&pool, HONDA, &reading_on(1000, "2026-01-01"))
        .await
        .unwrap();
    LogEntryRepo::append(&pool, HONDA, &reading_on(2000, "2026-02-01"))
        .await
        .unwrap();

    let listed = LogEntryRepo::list_by_vin(&pool, HONDA, DateRange::default(), None, None)
        .await
        .unwrap();
    let mileages: Vec<i64> = listed.iter().map(|e| e.mileage).collect();
    assert_eq!(mileages, [3000, 2000, 1000]);

    let record = VehicleRepo::find_record(&pool, HONDA).await.unwrap().unwrap();
    let seqs: Vec<i64> = record.log.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, [1, 2, 3]);
}

#[tokio::test]
async fn log_listing_filters_by_inclusive_date_range() {
    let pool = memory_pool().await;
    seed_quarter(&pool).await;

    let mileages = |entries: Vec<LogEntry>| -> Vec<i64> { entries.iter().map(|e| e.mileage).collect() };

    let since = LogEntryRepo::list_by_vin(&pool, HONDA, range(Some("2026-01-16"), None), None, None)
        .await
        .unwrap();
    assert_eq!(mileages(since), [1600, 1300]);

    let until = LogEntryRepo::list_by_vin(&pool, HONDA, range(None, Some("2026-01-16")), None, None)
        .await
        .unwrap();
    assert_eq!(mileages(until), [1300, 1000]);

    let one_day = range(Some("2026-01-16"), Some("2026-01-16"));
    let exact = LogEntryRepo::list_by_vin(&pool, HONDA, one_day, None, None)
        .await
        .unwrap();
    assert_eq!(mileages(exact), [1300]);

    let outside = range(Some("2025-01-01"), Some("2025-12-31"));
    let none = LogEntryRepo::list_by_vin(&pool, HONDA, outside, None, None)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn stats_summarise_the_whole_log() {
    let pool = memory_pool().await;
    seed_quarter(&pool).await;

    let stats = LogEntryRepo::stats(&pool, HONDA, DateRange::default()).await.unwrap();
    assert_eq!(stats.readings, 3);
    assert_eq!(stats.total_miles, 600);
    assert_eq!(stats.days_tracked, 30);
    assert_eq!(stats.average_daily_miles, Some(20.0));
    assert_eq!(stats.estimated_yearly_miles, Some(7300));
}

#[tokio::test]
async fn stats_respect_the_date_window() {
    let pool = memory_pool().await;
    seed_quarter(&pool).await;

    let late = LogEntryRepo::stats(&pool, HONDA, range(Some("2026-01-16"), None))
        .await
        .unwrap();
    assert_eq!(late.readings, 2);
    assert_eq!(late.total_miles, 300);
    assert_eq!(late.days_tracked, 15);
    assert_eq!(late.average_daily_miles, Some(20.0));

    let single = LogEntryRepo::stats(&pool, HONDA, range(None, Some("2026-01-01")))
        .await
        .unwrap();
    assert_eq!(single.readings, 1);
    assert!(!single.has_averages());

    let empty = LogEntryRepo::stats(&pool, HONDA, range(Some("2027-01-01"), None))
        .await
        .unwrap();
    assert_eq!(empty.readings, 0);
    assert_eq!(empty.total_miles, 0);
    assert!(!empty.has_averages());
}

#[tokio::test]
async fn stats_for_unknown_vin_are_empty() {
    let pool = memory_pool().await;
    let stats = LogEntryRepo::stats(&pool, ACURA, DateRange::default()).await.unwrap();
    assert_eq!(stats.readings, 0);
    assert!(!stats.has_averages());
}

#[tokio::test]
async fn delete_cascades_log_entries() {
    let pool = memory_pool().await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();
    LogEntryRepo::append(&pool, HONDA, &reading(10)).await.unwrap();

    assert!(VehicleRepo::delete(&pool, HONDA).await.unwrap());
    assert!(!VehicleRepo::delete(&pool, HONDA).await.unwrap());
    assert!(VehicleRepo::find_record(&pool, HONDA).await.unwrap().is_none());

    let orphans: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM vehicle_log_entries WHERE vin = ?1")
            .bind(HONDA)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans.0, 0);
}

#[tokio::test]
async fn negative_mileage_is_rejected_by_schema() {
    let pool = memory_pool().await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();

    let result = LogEntryRepo::append(&pool, HONDA, &reading(-5)).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();

    let pool = file_pool(&dir, 2).await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &metadata(Some("Keeper"), None))
        .await
        .unwrap();
    LogEntryRepo::append(&pool, HONDA, &reading(42)).await.unwrap();
    pool.close().await;

    let reopened = file_pool(&dir, 2).await;
    let record = VehicleRepo::find_record(&reopened, HONDA).await.unwrap().unwrap();
    assert_eq!(record.vehicle.nickname.as_deref(), Some("Keeper"));
    assert_eq!(record.log.len(), 1);
}

#[tokio::test]
async fn concurrent_appends_get_contiguous_sequence_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir, 4).await;
    VehicleRepo::upsert(&pool, &decode(&vin(HONDA)), &VehicleMetadata::default())
        .await
        .unwrap();

    let tasks = (0..20).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move {
            LogEntryRepo::append(&pool, HONDA, &reading(1000 + i))
                .await
                .unwrap()
                .unwrap()
        })
    });
    let entries: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(entries.len(), 20);

    let record = VehicleRepo::find_record(&pool, HONDA).await.unwrap().unwrap();
    let seqs: Vec<i64> = record.log.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, (1..=20).collect::<Vec<i64>>());
    assert_eq!(record.vehicle.current_mileage, Some(1019));
}
