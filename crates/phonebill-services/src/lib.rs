//! Services for PhoneBill
//!
//! This crate wires the storage backends to the query boundary.
//!
//! # Services
//!
//! - `CallQueryService` - Fetch, Append and Reset with parameter validation
//! - `MemoryBillStore` - process-local `BillStore`
//! - `CustomerLocks` - per-customer write serialization
//! - `build_store` - pick a backend from configuration
//! - `convert_text_to_store` - import a text-encoded bill into any store

pub mod converter;
pub mod locks;
pub mod memory_store;
pub mod query;
pub mod store_factory;

pub use converter::convert_text_to_store;
pub use locks::CustomerLocks;
pub use memory_store::MemoryBillStore;
pub use query::{messages, AppendRequest, CallQueryService, FetchRequest};
pub use store_factory::build_store;
