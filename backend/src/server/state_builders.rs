//! Builders wiring adapters, resilience and metrics into HTTP state.
//!
//! Composition order: store adapter, resilience registry, book service,
//! handler state.

use std::sync::Arc;

use actix_web::web;

use bookshelf::domain::BookService;
use bookshelf::domain::ports::{
    BookCommand, BookMetrics, BookQuery, BookRepository, FixtureStoreHealth, StoreHealth,
};
use bookshelf::inbound::http::state::HttpState;
use bookshelf::outbound::memory::InMemoryBookRepository;
use bookshelf::outbound::metrics::PrometheusBookMetrics;
use bookshelf::outbound::persistence::{DieselBookRepository, DieselStoreHealth};
use resilience::ResilienceRegistry;
use tracing::info;

use super::ServerConfig;

/// Build the book query/command pair over one shared service instance.
fn build_book_ports<R, M>(
    repo: R,
    metrics: Arc<M>,
    resilience: Arc<ResilienceRegistry>,
) -> (Arc<dyn BookQuery>, Arc<dyn BookCommand>)
where
    R: BookRepository + 'static,
    M: BookMetrics + 'static,
{
    let service = Arc::new(BookService::new(Arc::new(repo), metrics, resilience));
    let query: Arc<dyn BookQuery> = service.clone();
    let command: Arc<dyn BookCommand> = service;
    (query, command)
}

/// Build handler state from the server configuration.
///
/// # Errors
///
/// Returns [`std::io::Error`] if book metrics cannot be registered.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let metrics = PrometheusBookMetrics::new(&config.registry)
        .map(Arc::new)
        .map_err(|e| std::io::Error::other(format!("book metrics registration failed: {e}")))?;
    let resilience = Arc::new(ResilienceRegistry::new(config.resilience.clone()));

    let (books, book_commands, store_health) = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL book store");
            let (books, commands) =
                build_book_ports(DieselBookRepository::new(pool.clone()), metrics, resilience);
            let health: Arc<dyn StoreHealth> = Arc::new(DieselStoreHealth::new(pool.clone()));
            (books, commands, health)
        }
        None => {
            info!("no database configured; using in-memory book store");
            let (books, commands) =
                build_book_ports(InMemoryBookRepository::new(), metrics, resilience);
            let health: Arc<dyn StoreHealth> = Arc::new(FixtureStoreHealth);
            (books, commands, health)
        }
    };

    Ok(web::Data::new(HttpState::new(
        books,
        book_commands,
        store_health,
    )))
}
