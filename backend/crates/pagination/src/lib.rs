//! Offset pagination primitives shared by Bookshelf endpoints.
//!
//! A [`PageRequest`] carries a zero-based page number and a positive page
//! size and derives the row offset for the store query. A [`Page`] wraps one
//! slice of an ordered result set together with the total element count and
//! the derived page count.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(1, 2).expect("valid request");
//! assert_eq!(request.offset(), 2);
//!
//! let page = Page::new(vec!["c", "d"], request, 5);
//! assert_eq!(page.total_pages(), 3);
//! ```

mod page;
mod request;

pub use page::Page;
pub use request::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageRequestError};
