//! Repository implementations
//!
//! Concrete `BillStore` implementations backed by sqlx.

pub mod bill_repo;

pub use bill_repo::SqliteBillRepository;
