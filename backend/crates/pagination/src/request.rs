//! Validated offset page requests.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures raised by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The requested size was zero.
    #[error("page size must be greater than zero")]
    ZeroSize,
    /// The requested size exceeded [`MAX_PAGE_SIZE`].
    #[error("page size must not exceed {max}, got {size}")]
    SizeTooLarge {
        /// Size supplied by the caller.
        size: u32,
        /// Maximum permitted size.
        max: u32,
    },
}

/// Zero-based page number plus positive page size.
///
/// ## Invariants
/// - `size` lies in `1..=MAX_PAGE_SIZE`.
/// - `offset()` is `page * size` and never overflows (`u32 * u32` fits in
///   `u64`).
///
/// Deserialization runs the same validation as [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    size: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u32,
    size: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.size)
    }
}

impl PageRequest {
    /// Build a request after validating the page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroSize`] for a zero size and
    /// [`PageRequestError::SizeTooLarge`] when `size` exceeds
    /// [`MAX_PAGE_SIZE`].
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageRequestError};
    ///
    /// assert!(PageRequest::new(0, 20).is_ok());
    /// assert_eq!(PageRequest::new(0, 0), Err(PageRequestError::ZeroSize));
    /// ```
    pub const fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 {
            return Err(PageRequestError::ZeroSize);
        }
        if size > MAX_PAGE_SIZE {
            return Err(PageRequestError::SizeTooLarge {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, size })
    }

    /// First page with [`DEFAULT_PAGE_SIZE`] items.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64) * (self.size as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    //! Validation and offset arithmetic for page requests.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 20, 0)]
    #[case(1, 20, 20)]
    #[case(3, 7, 21)]
    #[case(u32::MAX, MAX_PAGE_SIZE, u64::from(u32::MAX) * u64::from(MAX_PAGE_SIZE))]
    fn offset_is_page_times_size(#[case] page: u32, #[case] size: u32, #[case] expected: u64) {
        let request = PageRequest::new(page, size).expect("valid request");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    fn zero_size_is_rejected() {
        assert_eq!(PageRequest::new(0, 0), Err(PageRequestError::ZeroSize));
    }

    #[rstest]
    fn oversized_page_is_rejected() {
        let err = PageRequest::new(0, MAX_PAGE_SIZE + 1).expect_err("too large");
        assert_eq!(
            err,
            PageRequestError::SizeTooLarge {
                size: MAX_PAGE_SIZE + 1,
                max: MAX_PAGE_SIZE,
            }
        );
        assert!(err.to_string().contains("must not exceed"));
    }

    #[rstest]
    #[case(r#"{"page":2,"size":0}"#, "greater than zero")]
    #[case(r#"{"page":0,"size":101}"#, "must not exceed")]
    fn deserialization_validates_size(#[case] json: &str, #[case] reason: &str) {
        let err = serde_json::from_str::<PageRequest>(json).expect_err("invalid size");
        assert!(err.to_string().contains(reason), "{err}");
    }

    #[rstest]
    fn valid_request_deserializes() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page":2,"size":5}"#).expect("valid request");
        assert_eq!(request.offset(), 10);
    }

    #[rstest]
    fn default_is_first_page_of_twenty() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
    }
}
