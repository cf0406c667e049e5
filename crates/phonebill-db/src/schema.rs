//! Two-table schema: customers and their calls

use phonebill_core::{AppError, AppResult};
use sqlx::SqlitePool;
use tracing::{debug, error};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS calls (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
        caller CHAR(12) NOT NULL,
        callee CHAR(12) NOT NULL,
        "begin" TIMESTAMP NOT NULL,
        "end" TIMESTAMP NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_calls_customer_id ON calls (customer_id)",
];

/// Create the tables if they do not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            error!("Failed to apply schema: {}", e);
            AppError::Database(format!("Failed to create schema: {}", e))
        })?;
    }
    debug!("Schema applied ({} statements)", SCHEMA.len());
    Ok(())
}
