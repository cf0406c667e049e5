//! PhoneBill Server
//!
//! Serves the phone call query boundary over HTTP, backed by the storage
//! selected in configuration.

use actix_web::{middleware, web, App, HttpServer};
use phonebill_api::configure_routes;
use phonebill_core::config::LoggingConfig;
use phonebill_core::AppConfig;
use phonebill_services::{build_store, CallQueryService};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "phonebill={level},phonebill_api={level},phonebill_services={level},phonebill_db={level},phonebill_text={level},actix_web=info,sqlx=warn",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.json {
        registry.with(fmt::layer().json().with_current_span(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    info!("Starting PhoneBill server v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config.storage).await?;
    let service = web::Data::new(CallQueryService::new(store));

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, config.server.workers
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .workers(config.server.workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("PhoneBill server stopped");
    Ok(())
}
