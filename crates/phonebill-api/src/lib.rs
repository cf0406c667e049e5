//! API layer for PhoneBill
//!
//! HTTP transport for the call query boundary: fetch, append and reset
//! under `/phonebill/calls`, plus a JSON health check.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

pub use dto::CallParams;
pub use handlers::{configure_calls, configure_health, configure_routes};
