//! Port for book persistence.
//!
//! Absence is modelled as `Ok(None)` or an empty collection, never as an
//! error. Errors are reserved for store failures and carry a transience
//! classification used by the retry policy.

use async_trait::async_trait;
use resilience::Transient;

use crate::domain::{Book, BookDraft, BookId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "book repository query failed: {message}",
    }
}

impl Transient for BookRepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Port for reading and writing books.
///
/// Collections are returned in ascending id order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find a book by id.
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// Find the lowest-id book whose description equals `description`.
    async fn find_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Book>, BookRepositoryError>;

    /// Find every book whose title contains `fragment`.
    async fn find_by_title_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError>;

    /// Read at most `limit` books after skipping `offset`.
    async fn find_page(&self, limit: u32, offset: u64) -> Result<Vec<Book>, BookRepositoryError>;

    /// Count every stored book.
    async fn count(&self) -> Result<u64, BookRepositoryError>;

    /// Insert a book and return it with its assigned id.
    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError>;

    /// Replace title and description of an existing book.
    ///
    /// Returns `None` when no book has the given id.
    async fn update(&self, book: &Book) -> Result<Option<Book>, BookRepositoryError>;

    /// Delete one book; deleting an absent id succeeds.
    async fn delete_by_id(&self, id: BookId) -> Result<(), BookRepositoryError>;

    /// Delete every book.
    async fn delete_all(&self) -> Result<(), BookRepositoryError>;
}

/// Fixture implementation for tests that do not exercise book persistence.
///
/// Behaves as an empty store that accepts writes without retaining them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookRepository;

#[async_trait]
impl BookRepository for FixtureBookRepository {
    async fn find_by_id(&self, _id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }

    async fn find_by_description(
        &self,
        _description: &str,
    ) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }

    async fn find_by_title_containing(
        &self,
        _fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_page(
        &self,
        _limit: u32,
        _offset: u64,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<u64, BookRepositoryError> {
        Ok(0)
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        Ok(Book::new(BookId::new(1), draft.clone()))
    }

    async fn update(&self, _book: &Book) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }

    async fn delete_by_id(&self, _id: BookId) -> Result<(), BookRepositoryError> {
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), BookRepositoryError> {
        Ok(())
    }
}
