//! Book aggregate.
//!
//! A book is identified by a store-assigned integer. The identifier is the
//! only component of equality: two values with the same id describe the same
//! book even when their text differs (for example before and after an
//! update).

use std::fmt;

/// Store-assigned book identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(i32);

impl BookId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for BookId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// Book content without an identifier, used for inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    /// Title text, stored verbatim.
    pub title: String,
    /// Description text, stored verbatim.
    pub description: String,
}

impl BookDraft {
    /// Build a draft from its text fields.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Persisted book.
///
/// # Examples
/// ```
/// use bookshelf::domain::{Book, BookDraft, BookId};
///
/// let stored = Book::new(BookId::new(1), BookDraft::new("Dune", "Spice"));
/// let renamed = stored.clone().with_content(BookDraft::new("Dune Messiah", "Sequel"));
/// assert_eq!(stored, renamed);
/// assert_eq!(renamed.title(), "Dune Messiah");
/// ```
#[derive(Debug, Clone)]
pub struct Book {
    id: BookId,
    title: String,
    description: String,
}

impl Book {
    /// Attach an identifier to draft content.
    #[must_use]
    pub fn new(id: BookId, draft: BookDraft) -> Self {
        let BookDraft { title, description } = draft;
        Self {
            id,
            title,
            description,
        }
    }

    /// Replace title and description, keeping the identifier.
    #[must_use]
    pub fn with_content(self, draft: BookDraft) -> Self {
        Self::new(self.id, draft)
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Title text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl std::hash::Hash for Book {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
