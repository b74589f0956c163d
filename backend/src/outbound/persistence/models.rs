//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use crate::domain::{Book, BookDraft, BookId};

use super::schema::books;

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: i32,
    pub title: String,
    pub description: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        let BookRow {
            id,
            title,
            description,
        } = row;
        Book::new(BookId::new(id), BookDraft { title, description })
    }
}

/// Insertable struct for creating new book records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

/// Changeset struct for replacing the text of a book.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
}
