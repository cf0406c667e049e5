//! PhoneBill Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the PhoneBill system. It includes:
//!
//! - Domain models (CallRecord, PhoneBill)
//! - Inclusive date-time range filtering over call sets
//! - The `BillStore` abstraction shared by every storage backend
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod time;
pub mod traits;

pub use config::AppConfig;
pub use error::{AppError, ParseError};
pub use filter::{filter_calls, CallRange};
pub use models::{CallRecord, PhoneBill};
pub use traits::BillStore;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
