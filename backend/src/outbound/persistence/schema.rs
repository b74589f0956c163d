//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations/2025-01-01-000000_create_books/up.sql`.

diesel::table! {
    /// Books table.
    ///
    /// `id` is a store-generated serial primary key.
    books (id) {
        /// Primary key assigned by the database sequence.
        id -> Int4,
        /// Book title.
        title -> Text,
        /// Book description.
        description -> Text,
    }
}
