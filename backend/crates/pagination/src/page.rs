//! Page envelope combining one slice of content with total-count metadata.

use serde::Serialize;

use crate::PageRequest;

/// One page of an ordered result set.
///
/// ## Invariants
/// - `content.len() <= size`; surplus items handed to [`Page::new`] are
///   dropped from the tail.
/// - `total_pages == ceil(total_elements / size)`, so it is `0` when
///   `total_elements` is `0`.
///
/// Serialises as
/// `{"content":[..],"page":0,"size":20,"totalElements":2,"totalPages":1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the store's slice and its total count.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(0, 20).expect("valid request");
    /// let page = Page::new(vec![1, 2], request, 2);
    /// assert_eq!(page.total_pages(), 1);
    /// assert_eq!(page.content(), &[1, 2]);
    /// ```
    #[must_use]
    pub fn new(mut content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = request.size();
        content.truncate(usize::try_from(size).unwrap_or(usize::MAX));
        Self {
            content,
            page: request.page(),
            size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(size)),
        }
    }

    /// Page with no content and a total of zero.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Items on this page in store order.
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of elements across every page.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Number of pages needed to hold every element.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Whether this page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Convert the items while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
