//! PhoneBill Database Layer
//!
//! This crate provides SQLite access for the PhoneBill system. It includes:
//!
//! - Connection pool management with sqlx
//! - Schema bootstrap for the `customers` and `calls` tables
//! - `SqliteBillRepository`, the relational `BillStore`

pub mod pool;
pub mod repositories;
pub mod schema;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use phonebill_core::{AppError, AppResult};
pub use sqlx::SqlitePool;
