//! HTTP request handlers

pub mod calls;
pub mod health;

use actix_web::web;

pub use calls::configure as configure_calls;
pub use health::configure as configure_health;

/// Configure every API route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health).configure(configure_calls);
}
