//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookDraft, BookId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookRow, BookUpdate, NewBookRow};
use super::pool::DbPool;
use super::schema::books;

/// Diesel-backed implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Build a `LIKE` pattern matching `fragment` anywhere in the column.
///
/// PostgreSQL's default escape character is the backslash.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_sql_int(value: u64, what: &str) -> Result<i64, BookRepositoryError> {
    i64::try_from(value).map_err(|_| BookRepositoryError::query(format!("{what} out of range")))
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = books::table
            .find(id.get())
            .select(BookRow::as_select())
            .first::<BookRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Book::from))
    }

    async fn find_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = books::table
            .filter(books::description.eq(description))
            .order(books::id.asc())
            .select(BookRow::as_select())
            .first::<BookRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Book::from))
    }

    async fn find_by_title_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookRow> = books::table
            .filter(books::title.like(contains_pattern(fragment)))
            .order(books::id.asc())
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_page(&self, limit: u32, offset: u64) -> Result<Vec<Book>, BookRepositoryError> {
        let offset = to_sql_int(offset, "page offset")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookRow> = books::table
            .order(books::id.asc())
            .limit(i64::from(limit))
            .offset(offset)
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn count(&self) -> Result<u64, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = books::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(total).map_err(|_| BookRepositoryError::query("negative book count"))
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewBookRow {
            title: &draft.title,
            description: &draft.description,
        };

        diesel::insert_into(books::table)
            .values(&new_row)
            .returning(BookRow::as_returning())
            .get_result::<BookRow>(&mut conn)
            .await
            .map(Book::from)
            .map_err(map_diesel_error)
    }

    async fn update(&self, book: &Book) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = BookUpdate {
            title: book.title(),
            description: book.description(),
        };

        let row = diesel::update(books::table.find(book.id().get()))
            .set(&changes)
            .returning(BookRow::as_returning())
            .get_result::<BookRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Book::from))
    }

    async fn delete_by_id(&self, id: BookId) -> Result<(), BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(books::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_all(&self) -> Result<(), BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(books::table)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
