//! SQLite connection pool management
//!
//! Provides utilities for creating the connection pool and bootstrapping
//! the two-table schema.

use crate::schema;
use phonebill_core::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Default maximum number of connections in the pool
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT: u64 = 30;

/// Default idle timeout in seconds
const DEFAULT_IDLE_TIMEOUT: u64 = 600;

/// Create a SQLite connection pool and make sure the schema exists
///
/// # Arguments
///
/// * `database_url` - SQLite URL (e.g., "sqlite://phonebill.db" or "sqlite::memory:")
/// * `max_connections` - Maximum number of connections in the pool (None = default)
///
/// The database file is created if missing. An in-memory database only
/// lives as long as its connection, so such pools are pinned to exactly
/// one connection that is never recycled.
///
/// # Example
///
/// ```no_run
/// use phonebill_db::create_pool;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool("sqlite://phonebill.db", None).await?;
///     Ok(())
/// }
/// ```
pub async fn create_pool(database_url: &str, max_connections: Option<u32>) -> AppResult<SqlitePool> {
    info!("Creating database connection pool");

    if !database_url.starts_with("sqlite:") {
        return Err(AppError::Config(format!(
            "Unsupported database URL {}: expected a sqlite: URL",
            database_url
        )));
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Config(format!("Invalid database URL {}: {}", database_url, e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = is_in_memory(database_url);
    let max_conns = if in_memory {
        1
    } else {
        max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));
    pool_options = if in_memory {
        pool_options
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        pool_options.idle_timeout(Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT)))
    };

    let pool = pool_options.connect_with(options).await.map_err(|e| {
        warn!("Failed to create database pool: {}", e);
        AppError::Pool(format!("Failed to connect to database: {}", e))
    })?;

    info!(
        "Database pool created successfully with {} max connections",
        max_conns
    );

    schema::ensure_schema(&pool).await?;

    info!("Database schema verified");

    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:bills?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://phonebill.db"));
    }

    #[tokio::test]
    async fn test_create_in_memory_pool() {
        let pool = create_pool("sqlite::memory:", Some(8)).await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_create_file_pool_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bills.db");
        let url = format!("sqlite://{}", path.display());

        create_pool(&url, None).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let err = create_pool("postgres://localhost/bills", None).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
