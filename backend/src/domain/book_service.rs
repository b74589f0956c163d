//! Book domain service.
//!
//! Implements the book driving ports by running every repository call through
//! the named resilience policy of its [`BookOperation`], recording metrics
//! around it, and substituting the operation's fallback when the policy
//! gives up.
//!
//! Fallbacks favour availability: a degraded store makes reads look empty and
//! makes update or delete look like "not found" or a no-op. Callers cannot
//! tell those outcomes apart from a genuinely absent book; every substitution
//! is logged at `warn` so operators can.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use resilience::{ResilienceError, ResilienceRegistry};
use tracing::{debug, warn};

use crate::domain::ports::{
    BookCommand, BookMetrics, BookMetricsError, BookQuery, BookRepository, BookRepositoryError,
};
use crate::domain::{Book, BookDraft, BookId, BookOperation, Error};

type GuardError = ResilienceError<BookRepositoryError>;

/// Book service implementing the query and command driving ports.
pub struct BookService<R, M> {
    repo: Arc<R>,
    metrics: Arc<M>,
    resilience: Arc<ResilienceRegistry>,
}

impl<R, M> Clone for BookService<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            metrics: Arc::clone(&self.metrics),
            resilience: Arc::clone(&self.resilience),
        }
    }
}

impl<R, M> BookService<R, M> {
    /// Create a service over a repository, a metrics recorder and the shared
    /// resilience registry.
    pub fn new(repo: Arc<R>, metrics: Arc<M>, resilience: Arc<ResilienceRegistry>) -> Self {
        Self {
            repo,
            metrics,
            resilience,
        }
    }
}

impl<R, M> BookService<R, M>
where
    R: BookRepository,
    M: BookMetrics + 'static,
{
    async fn guarded<T, F, Fut, Fb>(
        &self,
        operation: BookOperation,
        call: F,
        fallback: Fb,
    ) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BookRepositoryError>>,
        Fb: FnOnce(&GuardError) -> Result<T, Error>,
    {
        let timer = DurationTimer::start(operation, Arc::clone(&self.metrics));
        report(operation, self.metrics.record_call(operation).await);

        let policy = self.resilience.policy(operation.name());
        let outcome = match policy.execute(call).await {
            Ok(value) => Ok(value),
            Err(error) => {
                report(operation, self.metrics.record_error(operation).await);
                warn!(
                    operation = %operation,
                    error = %error,
                    short_circuited = error.is_short_circuit(),
                    attempts = error.attempts(),
                    "book operation failed; substituting fallback"
                );
                fallback(&error)
            }
        };

        timer.finish().await;
        outcome
    }
}

/// Records one duration sample per guarded call.
///
/// A timer dropped before [`DurationTimer::finish`] (the request future was
/// cancelled) records its sample from a spawned task.
struct DurationTimer<M: BookMetrics + 'static> {
    operation: BookOperation,
    metrics: Arc<M>,
    started: Instant,
    pending: bool,
}

impl<M: BookMetrics + 'static> DurationTimer<M> {
    fn start(operation: BookOperation, metrics: Arc<M>) -> Self {
        Self {
            operation,
            metrics,
            started: Instant::now(),
            pending: true,
        }
    }

    async fn finish(mut self) {
        self.pending = false;
        let elapsed = self.started.elapsed();
        report(
            self.operation,
            self.metrics.record_duration(self.operation, elapsed).await,
        );
    }
}

impl<M: BookMetrics + 'static> Drop for DurationTimer<M> {
    fn drop(&mut self) {
        if !self.pending {
            return;
        }
        let (operation, elapsed) = (self.operation, self.started.elapsed());
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(operation = %operation, "no runtime; cancelled call duration dropped");
            return;
        };
        debug!(operation = %operation, ?elapsed, "book operation cancelled");
        let metrics = Arc::clone(&self.metrics);
        runtime.spawn(async move {
            report(operation, metrics.record_duration(operation, elapsed).await);
        });
    }
}

fn report(operation: BookOperation, result: Result<(), BookMetricsError>) {
    if let Err(error) = result {
        warn!(operation = %operation, detail = error.message(), "failed to record book metrics");
    }
}

#[async_trait]
impl<R, M> BookQuery for BookService<R, M>
where
    R: BookRepository,
    M: BookMetrics + 'static,
{
    async fn list_books(&self, request: PageRequest) -> Result<Page<Book>, Error> {
        let repo = &self.repo;
        let (limit, offset) = (request.size(), request.offset());
        let (content, total) = self
            .guarded(
                BookOperation::GetAllBooks,
                move || async move {
                    tokio::try_join!(repo.find_page(limit, offset), repo.count())
                },
                |_| Ok((Vec::new(), 0)),
            )
            .await?;
        Ok(Page::new(content, request, total))
    }

    async fn find_by_title(&self, fragment: &str) -> Result<Vec<Book>, Error> {
        let repo = &self.repo;
        self.guarded(
            BookOperation::FindByTitle,
            move || repo.find_by_title_containing(fragment),
            |_| Ok(Vec::new()),
        )
        .await
    }

    async fn find_by_description(&self, description: &str) -> Result<Option<Book>, Error> {
        let repo = &self.repo;
        self.guarded(
            BookOperation::FindByDescription,
            move || repo.find_by_description(description),
            |_| Ok(None),
        )
        .await
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>, Error> {
        let repo = &self.repo;
        self.guarded(
            BookOperation::GetBookById,
            move || repo.find_by_id(id),
            |_| Ok(None),
        )
        .await
    }
}

#[async_trait]
impl<R, M> BookCommand for BookService<R, M>
where
    R: BookRepository,
    M: BookMetrics + 'static,
{
    async fn create_book(&self, draft: BookDraft) -> Result<Book, Error> {
        let repo = &self.repo;
        let draft = &draft;
        self.guarded(
            BookOperation::SaveBook,
            move || repo.insert(draft),
            |_| {
                Err(Error::service_unavailable(
                    "book store unavailable; the book was not saved",
                ))
            },
        )
        .await
    }

    async fn update_book(&self, id: BookId, draft: BookDraft) -> Result<Option<Book>, Error> {
        let repo = &self.repo;
        let book = Book::new(id, draft);
        let book = &book;
        self.guarded(
            BookOperation::UpdateBook,
            move || repo.update(book),
            |_| Ok(None),
        )
        .await
    }

    async fn delete_book(&self, id: BookId) -> Result<(), Error> {
        let repo = &self.repo;
        self.guarded(
            BookOperation::DeleteById,
            move || repo.delete_by_id(id),
            |_| Ok(()),
        )
        .await
    }

    async fn delete_all_books(&self) -> Result<(), Error> {
        let repo = &self.repo;
        self.guarded(
            BookOperation::DeleteAll,
            move || repo.delete_all(),
            |_| Ok(()),
        )
        .await
    }
}

#[cfg(test)]
#[path = "book_service_tests.rs"]
mod tests;
