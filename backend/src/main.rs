//! Bookshelf entry-point: loads settings, wires adapters and serves HTTP.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use prometheus::Registry;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bookshelf::inbound::http::health::HealthState;
use bookshelf::outbound::persistence::DbPool;
use bookshelf::settings::BookshelfSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BookshelfSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let db_pool = match settings.pool_config() {
        Some(pool_config) => {
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|e| io::Error::other(format!("database pool setup failed: {e}")))?;
            info!("database pool ready");
            Some(pool)
        }
        None => None,
    };

    let registry = Registry::new();
    let config = ServerConfig::new(bind_addr, settings.resilience_config(), registry)
        .with_db_pool(db_pool);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
