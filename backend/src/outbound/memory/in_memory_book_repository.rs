//! Process-local `BookRepository` backed by an ordered map.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookDraft, BookId};

#[derive(Debug)]
struct Shelf {
    books: BTreeMap<i32, Book>,
    next_id: i32,
}

impl Default for Shelf {
    fn default() -> Self {
        Self {
            books: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory book store.
///
/// Ids are assigned sequentially from 1 and never reused. Iteration order is
/// ascending id, matching the PostgreSQL adapter.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    shelf: Mutex<Shelf>,
}

impl InMemoryBookRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self) -> MutexGuard<'_, Shelf> {
        self.shelf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self.shelf().books.get(&id.get()).cloned())
    }

    async fn find_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self
            .shelf()
            .books
            .values()
            .find(|book| book.description() == description)
            .cloned())
    }

    async fn find_by_title_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self
            .shelf()
            .books
            .values()
            .filter(|book| book.title().contains(fragment))
            .cloned()
            .collect())
    }

    async fn find_page(&self, limit: u32, offset: u64) -> Result<Vec<Book>, BookRepositoryError> {
        let shelf = self.shelf();
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(shelf.books.values().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self) -> Result<u64, BookRepositoryError> {
        Ok(self.shelf().books.len() as u64)
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut shelf = self.shelf();
        let id = shelf.next_id;
        shelf.next_id = id
            .checked_add(1)
            .ok_or_else(|| BookRepositoryError::query("book id space exhausted"))?;

        let book = Book::new(BookId::new(id), draft.clone());
        shelf.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book) -> Result<Option<Book>, BookRepositoryError> {
        let mut shelf = self.shelf();
        Ok(shelf.books.get_mut(&book.id().get()).map(|stored| {
            *stored = book.clone();
            stored.clone()
        }))
    }

    async fn delete_by_id(&self, id: BookId) -> Result<(), BookRepositoryError> {
        self.shelf().books.remove(&id.get());
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), BookRepositoryError> {
        self.shelf().books.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn repo() -> InMemoryBookRepository {
        InMemoryBookRepository::new()
    }

    async fn seed(repo: &InMemoryBookRepository, books: &[(&str, &str)]) -> Vec<Book> {
        let mut stored = Vec::new();
        for (title, description) in books {
            let book = repo
                .insert(&BookDraft::new(*title, *description))
                .await
                .expect("insert succeeds");
            stored.push(book);
        }
        stored
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_sequential_ids(repo: InMemoryBookRepository) {
        let stored = seed(&repo, &[("A", "a"), ("B", "b")]).await;

        assert_eq!(stored[0].id(), BookId::new(1));
        assert_eq!(stored[1].id(), BookId::new(2));
        assert_eq!(repo.count().await.expect("count"), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_not_reused_after_delete(repo: InMemoryBookRepository) {
        seed(&repo, &[("A", "a")]).await;
        repo.delete_all().await.expect("delete all");

        let stored = seed(&repo, &[("B", "b")]).await;

        assert_eq!(stored[0].id(), BookId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn find_page_slices_in_id_order(repo: InMemoryBookRepository) {
        seed(&repo, &[("A", "a"), ("B", "b"), ("C", "c"), ("D", "d"), ("E", "e")]).await;

        let page = repo.find_page(2, 2).await.expect("page");

        let titles: Vec<_> = page.iter().map(Book::title).collect();
        assert_eq!(titles, ["C", "D"]);
        assert!(repo.find_page(2, 10).await.expect("page").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn title_search_is_case_sensitive_substring(repo: InMemoryBookRepository) {
        seed(
            &repo,
            &[("Rust in Action", "a"), ("Programming rust", "b"), ("Rusty", "c")],
        )
        .await;

        let found = repo.find_by_title_containing("Rust").await.expect("search");

        let titles: Vec<_> = found.iter().map(Book::title).collect();
        assert_eq!(titles, ["Rust in Action", "Rusty"]);
    }

    #[rstest]
    #[tokio::test]
    async fn description_lookup_returns_lowest_id(repo: InMemoryBookRepository) {
        seed(&repo, &[("First", "same"), ("Second", "same")]).await;

        let found = repo
            .find_by_description("same")
            .await
            .expect("lookup")
            .expect("match");

        assert_eq!(found.title(), "First");
        assert!(repo.find_by_description("other").await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_existing_only(repo: InMemoryBookRepository) {
        let stored = seed(&repo, &[("Old", "old")]).await;
        let changed = stored[0].clone().with_content(BookDraft::new("New", "new"));

        let updated = repo.update(&changed).await.expect("update").expect("present");
        assert_eq!(updated.title(), "New");

        let missing = Book::new(BookId::new(99), BookDraft::new("X", "x"));
        assert!(repo.update(&missing).await.expect("update").is_none());
        assert_eq!(repo.count().await.expect("count"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_absent_id_succeeds(repo: InMemoryBookRepository) {
        seed(&repo, &[("A", "a")]).await;

        repo.delete_by_id(BookId::new(42)).await.expect("delete");
        repo.delete_by_id(BookId::new(1)).await.expect("delete");

        assert!(repo.find_by_id(BookId::new(1)).await.expect("find").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn exhausted_id_space_is_a_query_error(repo: InMemoryBookRepository) {
        repo.shelf().next_id = i32::MAX;

        let err = repo
            .insert(&BookDraft::new("Last", "last"))
            .await
            .expect_err("id overflow");

        assert!(matches!(err, BookRepositoryError::Query { .. }));
        assert_eq!(repo.count().await.expect("count"), 0);
    }
}
