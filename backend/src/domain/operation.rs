//! Logical book operations.
//!
//! Each operation owns one resilience policy and one set of metric series,
//! keyed by [`BookOperation::name`].

use std::fmt;

/// Resilience-wrapped operation exposed by the book service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookOperation {
    /// Paged listing with total count.
    GetAllBooks,
    /// Substring search on titles.
    FindByTitle,
    /// Exact match on descriptions.
    FindByDescription,
    /// Point lookup by identifier.
    GetBookById,
    /// Insert of a new book.
    SaveBook,
    /// Replacement of title and description.
    UpdateBook,
    /// Removal of one book.
    DeleteById,
    /// Removal of every book.
    DeleteAll,
}

impl BookOperation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::GetAllBooks,
        Self::FindByTitle,
        Self::FindByDescription,
        Self::GetBookById,
        Self::SaveBook,
        Self::UpdateBook,
        Self::DeleteById,
        Self::DeleteAll,
    ];

    /// Stable name used for breaker lookup, logs and metric labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetAllBooks => "getAllBooks",
            Self::FindByTitle => "findByTitle",
            Self::FindByDescription => "findByDescription",
            Self::GetBookById => "getBookById",
            Self::SaveBook => "saveBook",
            Self::UpdateBook => "updateBook",
            Self::DeleteById => "deleteById",
            Self::DeleteAll => "deleteAll",
        }
    }
}

impl fmt::Display for BookOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn names_are_unique() {
        let names: HashSet<_> = BookOperation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), BookOperation::ALL.len());
    }

    #[rstest]
    #[case(BookOperation::GetAllBooks, "getAllBooks")]
    #[case(BookOperation::DeleteById, "deleteById")]
    fn display_uses_name(#[case] operation: BookOperation, #[case] expected: &str) {
        assert_eq!(operation.to_string(), expected);
    }
}
