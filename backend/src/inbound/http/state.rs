//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookCommand, BookQuery, FixtureBookCommand, FixtureBookQuery, FixtureStoreHealth, StoreHealth,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub books: Arc<dyn BookQuery>,
    pub book_commands: Arc<dyn BookCommand>,
    pub store_health: Arc<dyn StoreHealth>,
}

impl HttpState {
    /// Construct state from the book ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bookshelf::domain::ports::{FixtureBookCommand, FixtureBookQuery, FixtureStoreHealth};
    /// use bookshelf::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureBookQuery),
    ///     Arc::new(FixtureBookCommand),
    ///     Arc::new(FixtureStoreHealth),
    /// );
    /// let _books = state.books.clone();
    /// ```
    pub fn new(
        books: Arc<dyn BookQuery>,
        book_commands: Arc<dyn BookCommand>,
        store_health: Arc<dyn StoreHealth>,
    ) -> Self {
        Self {
            books,
            book_commands,
            store_health,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureBookQuery),
            Arc::new(FixtureBookCommand),
            Arc::new(FixtureStoreHealth),
        )
    }
}
