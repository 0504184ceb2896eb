//! SQLite-backed vehicle store.
//!
//! Connection pooling, embedded migrations and the health check live here;
//! table access goes through the zero-sized repositories in
//! [`repositories`].

use std::str::FromStr;
use std::time::Duration;

use carlog_core::health::HealthStatus;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool from a database URL.
///
/// File databases are created if missing and opened in WAL mode so readers
/// do not block the single writer. In-memory databases exist per
/// connection, so they are pinned to one connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let in_memory = is_in_memory(database_url);

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    pool_options.connect_with(options).await
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Run a trivial query to confirm the database answers.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check the store and report the outcome as a [`HealthStatus`].
///
/// Failures are logged and folded into the degraded status; this never
/// returns an error.
pub async fn health_status(pool: &DbPool) -> HealthStatus {
    match health_check(pool).await {
        Ok(()) => HealthStatus::up(),
        Err(err) => {
            tracing::warn!(error = %err, "Vehicle store health check failed");
            HealthStatus::down()
        }
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
