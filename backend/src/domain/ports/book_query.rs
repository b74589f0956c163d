//! Driving port for book read operations.
//!
//! Inbound adapters use this port to read books without depending on
//! repository, resilience or metrics details. Reads never fail because of a
//! degraded store: the service substitutes an empty result instead, so
//! "absent" and "suppressed" look the same to callers.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Book, BookId, Error};

/// Driving port for book read operations.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), bookshelf::domain::Error> {
/// use bookshelf::domain::ports::{BookQuery, FixtureBookQuery};
/// use pagination::PageRequest;
///
/// let page = FixtureBookQuery.list_books(PageRequest::first()).await?;
/// assert!(page.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookQuery: Send + Sync {
    /// Read one page of books together with the total count.
    async fn list_books(&self, request: PageRequest) -> Result<Page<Book>, Error>;

    /// Find books whose title contains `fragment`.
    async fn find_by_title(&self, fragment: &str) -> Result<Vec<Book>, Error>;

    /// Find the first book whose description equals `description`.
    async fn find_by_description(&self, description: &str) -> Result<Option<Book>, Error>;

    /// Fetch one book by id.
    async fn get_book(&self, id: BookId) -> Result<Option<Book>, Error>;
}

/// Fixture query that always sees an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookQuery;

#[async_trait]
impl BookQuery for FixtureBookQuery {
    async fn list_books(&self, request: PageRequest) -> Result<Page<Book>, Error> {
        Ok(Page::empty(request))
    }

    async fn find_by_title(&self, _fragment: &str) -> Result<Vec<Book>, Error> {
        Ok(Vec::new())
    }

    async fn find_by_description(&self, _description: &str) -> Result<Option<Book>, Error> {
        Ok(None)
    }

    async fn get_book(&self, _id: BookId) -> Result<Option<Book>, Error> {
        Ok(None)
    }
}
