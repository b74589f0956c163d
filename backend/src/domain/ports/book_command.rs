//! Driving port for book write operations.

use async_trait::async_trait;

use crate::domain::{Book, BookDraft, BookId, Error};

/// Driving port for book write operations.
///
/// Only creation can report a degraded store (as
/// [`crate::domain::ErrorCode::ServiceUnavailable`]); the other writes fall
/// back to "not found" or a silent no-op.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCommand: Send + Sync {
    /// Store a new book and return it with its assigned id.
    async fn create_book(&self, draft: BookDraft) -> Result<Book, Error>;

    /// Replace the text of an existing book.
    ///
    /// Returns `None` when the id is unknown.
    async fn update_book(&self, id: BookId, draft: BookDraft) -> Result<Option<Book>, Error>;

    /// Delete one book. Deleting an unknown id succeeds.
    async fn delete_book(&self, id: BookId) -> Result<(), Error>;

    /// Delete every book.
    async fn delete_all_books(&self) -> Result<(), Error>;
}

/// Fixture command that accepts every write without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookCommand;

#[async_trait]
impl BookCommand for FixtureBookCommand {
    async fn create_book(&self, draft: BookDraft) -> Result<Book, Error> {
        Ok(Book::new(BookId::new(1), draft))
    }

    async fn update_book(&self, _id: BookId, _draft: BookDraft) -> Result<Option<Book>, Error> {
        Ok(None)
    }

    async fn delete_book(&self, _id: BookId) -> Result<(), Error> {
        Ok(())
    }

    async fn delete_all_books(&self) -> Result<(), Error> {
        Ok(())
    }
}
