//! Phone bill repository implementation
//!
//! Persists bills across the `customers` and `calls` tables. Customer rows
//! are created on demand with a single upsert statement, so repeated
//! writes for the same name never produce a second customer row. Call rows
//! are never deduplicated.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use phonebill_core::time::truncate_to_minute;
use phonebill_core::{AppError, AppResult, BillStore, CallRecord, PhoneBill};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, instrument};

/// SQLite implementation of `BillStore`
#[derive(Debug, Clone)]
pub struct SqliteBillRepository {
    pool: SqlitePool,
}

impl SqliteBillRepository {
    /// Create a new bill repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Surrogate id of `name`, if the customer has been stored
    #[instrument(skip(self))]
    pub async fn find_customer_id(&self, name: &str) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM customers WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding customer {}: {}", name, e);
                AppError::Database(format!("Failed to find customer: {}", e))
            })
    }

    /// Names of every stored customer, alphabetically
    #[instrument(skip(self))]
    pub async fn customer_names(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM customers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing customers: {}", e);
                AppError::Database(format!("Failed to list customers: {}", e))
            })
    }
}

#[derive(sqlx::FromRow)]
struct CallRow {
    caller: String,
    callee: String,
    begin: NaiveDateTime,
    end: NaiveDateTime,
}

impl CallRow {
    /// Rows written by other tools may carry seconds
    fn into_record(self, customer: &str) -> CallRecord {
        CallRecord::new(
            customer,
            self.caller,
            self.callee,
            truncate_to_minute(self.begin),
            truncate_to_minute(self.end),
        )
    }
}

/// Find or create the customer row, returning its id
async fn upsert_customer(conn: &mut SqliteConnection, name: &str) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO customers (name) VALUES (?1)
        ON CONFLICT (name) DO UPDATE SET name = excluded.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        error!("Database error upserting customer {}: {}", name, e);
        AppError::Database(format!("Failed to get or create customer: {}", e))
    })
}

async fn insert_call(conn: &mut SqliteConnection, customer_id: i64, call: &CallRecord) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO calls (customer_id, caller, callee, "begin", "end")
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(customer_id)
    .bind(&call.caller)
    .bind(&call.callee)
    .bind(call.begin)
    .bind(call.end)
    .execute(conn)
    .await
    .map_err(|e| {
        error!("Database error inserting call: {}", e);
        AppError::Database(format!("Failed to insert call: {}", e))
    })?;
    Ok(())
}

#[async_trait]
impl BillStore for SqliteBillRepository {
    fn backend_name(&self) -> &'static str {
        "database"
    }

    #[instrument(skip(self))]
    async fn load(&self, customer: &str) -> AppResult<PhoneBill> {
        let mut bill = PhoneBill::new(customer);

        let Some(customer_id) = self.find_customer_id(customer).await? else {
            debug!("Customer {} not stored yet", customer);
            return Ok(bill);
        };

        let rows = sqlx::query_as::<_, CallRow>(
            r#"SELECT caller, callee, "begin", "end" FROM calls WHERE customer_id = ?1 ORDER BY id"#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error loading calls for {}: {}", customer, e);
            AppError::Database(format!("Failed to load calls: {}", e))
        })?;

        for row in rows {
            bill.add_call(row.into_record(customer));
        }

        debug!("Loaded {} calls for {}", bill.len(), customer);
        Ok(bill)
    }

    #[instrument(skip(self, bill), fields(customer = %bill.customer(), calls = bill.len()))]
    async fn persist(&self, bill: &PhoneBill) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin transaction: {}", e);
            AppError::Database(format!("Failed to begin transaction: {}", e))
        })?;

        let customer_id = upsert_customer(&mut tx, bill.customer()).await?;
        for call in bill.calls() {
            insert_call(&mut tx, customer_id, call).await?;
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit bill for {}: {}", bill.customer(), e);
            AppError::Database(format!("Failed to commit transaction: {}", e))
        })?;

        debug!("Persisted {} calls for customer id {}", bill.len(), customer_id);
        Ok(())
    }

    /// Insert just the new row; re-persisting the loaded bill would
    /// duplicate every existing call.
    #[instrument(skip(self, call), fields(customer = %call.customer))]
    async fn append_call(&self, call: CallRecord) -> AppResult<()> {
        let customer = call.customer.clone();
        self.persist(&PhoneBill::with_calls(customer, [call])).await
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let calls = sqlx::query("DELETE FROM calls").execute(&mut *tx).await?;
        let customers = sqlx::query("DELETE FROM customers").execute(&mut *tx).await?;
        tx.commit().await?;

        info!(
            "Deleted {} calls and {} customers",
            calls.rows_affected(),
            customers.rows_affected()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn call(customer: &str, d: u32) -> CallRecord {
        CallRecord::new(customer, "503-245-2345", "765-389-1273", at(d, 8, 56), at(d, 10, 27))
    }

    async fn repo() -> SqliteBillRepository {
        SqliteBillRepository::new(create_pool("sqlite::memory:", None).await.unwrap())
    }

    async fn customer_rows(repo: &SqliteBillRepository, name: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE name = ?1")
            .bind(name)
            .fetch_one(repo.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_customer_loads_empty_bill() {
        let repo = repo().await;
        let bill = repo.load("Dave").await.unwrap();
        assert_eq!(bill.customer(), "Dave");
        assert!(bill.is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let repo = repo().await;
        let bill = PhoneBill::with_calls("Dave", vec![call("Dave", 27), call("Dave", 3)]);

        repo.persist(&bill).await.unwrap();

        let loaded = repo.load("Dave").await.unwrap();
        assert_eq!(loaded.customer(), "Dave");
        assert_eq!(loaded.into_calls(), bill.into_calls());
    }

    #[tokio::test]
    async fn test_persisting_same_customer_twice_keeps_one_row() {
        let repo = repo().await;
        let empty = PhoneBill::new("Dave");

        repo.persist(&empty).await.unwrap();
        repo.persist(&empty).await.unwrap();

        assert_eq!(customer_rows(&repo, "Dave").await, 1);
        assert!(repo.find_customer_id("Dave").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_persisting_twice_duplicates_calls() {
        let repo = repo().await;
        let bill = PhoneBill::with_calls("Dave", vec![call("Dave", 27)]);

        repo.persist(&bill).await.unwrap();
        repo.persist(&bill).await.unwrap();

        assert_eq!(customer_rows(&repo, "Dave").await, 1);
        assert_eq!(repo.load("Dave").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_append_call_inserts_only_new_row() {
        let repo = repo().await;

        repo.append_call(call("Dave", 1)).await.unwrap();
        repo.append_call(call("Dave", 2)).await.unwrap();
        repo.append_call(call("Dave", 3)).await.unwrap();

        assert_eq!(repo.load("Dave").await.unwrap().len(), 3);
        assert_eq!(customer_rows(&repo, "Dave").await, 1);
    }

    #[tokio::test]
    async fn test_customers_are_isolated() {
        let repo = repo().await;
        repo.append_call(call("Dave", 1)).await.unwrap();
        repo.append_call(call("Eve", 2)).await.unwrap();

        let dave = repo.load("Dave").await.unwrap();
        assert_eq!(dave.len(), 1);
        assert_eq!(dave.calls()[0].customer, "Dave");
        assert_eq!(
            repo.customer_names().await.unwrap(),
            vec!["Dave".to_string(), "Eve".to_string()]
        );
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let repo = repo().await;
        repo.append_call(call("Dave", 1)).await.unwrap();

        repo.clear().await.unwrap();

        assert!(repo.load("Dave").await.unwrap().is_empty());
        assert!(repo.customer_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stored_seconds_are_dropped() {
        let repo = repo().await;
        repo.persist(&PhoneBill::new("Dave")).await.unwrap();
        let id = repo.find_customer_id("Dave").await.unwrap().unwrap();

        sqlx::query(
            r#"INSERT INTO calls (customer_id, caller, callee, "begin", "end") VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )
        .bind(id)
        .bind("503-245-2345")
        .bind("765-389-1273")
        .bind(at(27, 8, 56) + chrono::Duration::seconds(42))
        .bind(at(27, 10, 27) + chrono::Duration::seconds(5))
        .execute(repo.pool())
        .await
        .unwrap();

        let bill = repo.load("Dave").await.unwrap();
        assert_eq!(bill.calls()[0].begin, at(27, 8, 56));
        assert_eq!(bill.calls()[0].end, at(27, 10, 27));
    }

    #[tokio::test]
    async fn test_closed_pool_surfaces_error() {
        let repo = repo().await;
        repo.pool().close().await;

        let err = repo.load("Dave").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
