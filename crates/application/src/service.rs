use std::future::Future;

use vlib_core::{Book, CatalogError, ConvertResult, Message, SearchResults, SyncSummary};

use crate::catalog::CatalogEvent;
use crate::search::SearchOutcome;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load books";

/// Remote catalog operations. Each call is one request against the backend.
pub trait CatalogService: Send + Sync {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Book>, CatalogError>> + Send;

    fn search(&self, query: &str)
    -> impl Future<Output = Result<SearchResults, CatalogError>> + Send;

    fn sync_from_folder(
        &self,
        folder_path: &str,
    ) -> impl Future<Output = Result<SyncSummary, CatalogError>> + Send;

    fn toggle_read(&self, book: &Book) -> impl Future<Output = Result<Message, CatalogError>> + Send;

    fn remove(&self, book: &Book) -> impl Future<Output = Result<Message, CatalogError>> + Send;

    fn convert(
        &self,
        file_path: &str,
    ) -> impl Future<Output = Result<ConvertResult, CatalogError>> + Send;

    fn books_folder(&self) -> impl Future<Output = Result<String, CatalogError>> + Send;

    /// Absolute URL of the server-rendered view for `title`.
    fn view_url(&self, title: &str) -> String;

    fn resolve_file_path(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<String, CatalogError>> + Send {
        async move {
            let results = self.search(title).await?;
            pick_file_path(title, &results.books)
        }
    }
}

/// Title search is a substring match, so prefer the exact title when present.
pub fn pick_file_path(title: &str, books: &[Book]) -> Result<String, CatalogError> {
    books
        .iter()
        .find(|b| b.title == title)
        .or_else(|| books.first())
        .map(|b| b.path.clone())
        .ok_or_else(|| CatalogError::NotFound {
            title: title.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenPlan {
    Navigate(String),
    ConfirmConvert(Book),
}

pub async fn load<S: CatalogService>(service: &S) -> CatalogEvent {
    match service.list_all().await {
        Ok(books) => {
            tracing::debug!(count = books.len(), "catalog loaded");
            CatalogEvent::Loaded(Ok(books))
        }
        Err(err) => {
            tracing::error!(error = %err, "loading catalog failed");
            CatalogEvent::Loaded(Err(LOAD_FAILED_MESSAGE.to_string()))
        }
    }
}

pub async fn run_search<S: CatalogService>(service: &S, query: &str) -> Option<CatalogEvent> {
    match service.search(query).await {
        Ok(results) => {
            tracing::debug!(query, count = results.count, "search finished");
            Some(CatalogEvent::Searched(SearchOutcome::Results(results.books)))
        }
        Err(err) => {
            tracing::warn!(query, error = %err, "search failed");
            None
        }
    }
}

pub async fn toggle_read<S: CatalogService>(service: &S, book: &Book) -> Option<CatalogEvent> {
    match service.toggle_read(book).await {
        Ok(reply) => {
            tracing::info!(id = %book.id, message = %reply.message, "toggled read state");
            Some(load(service).await)
        }
        Err(err) => {
            tracing::warn!(id = %book.id, title = %book.title, error = %err, "toggle read failed");
            None
        }
    }
}

pub async fn remove<S: CatalogService>(service: &S, book: &Book) -> Option<CatalogEvent> {
    match service.remove(book).await {
        Ok(reply) => {
            tracing::info!(id = %book.id, message = %reply.message, "deleted book");
            Some(load(service).await)
        }
        Err(err) => {
            tracing::warn!(id = %book.id, title = %book.title, error = %err, "delete failed");
            None
        }
    }
}

pub fn plan_open<S: CatalogService>(service: &S, book: &Book) -> OpenPlan {
    if book.is_directly_viewable() {
        OpenPlan::Navigate(service.view_url(&book.title))
    } else {
        OpenPlan::ConfirmConvert(book.clone())
    }
}

pub async fn convert_and_open<S: CatalogService>(service: &S, book: &Book) -> CatalogEvent {
    let result = async {
        let file_path = service.resolve_file_path(&book.title).await?;
        let converted = service.convert(&file_path).await?;
        tracing::info!(
            title = %book.title,
            output = converted.pdf_path.as_deref().unwrap_or("-"),
            "conversion finished"
        );
        Ok::<_, CatalogError>(())
    }
    .await;

    match result {
        Ok(()) => CatalogEvent::Navigate(service.view_url(&book.title)),
        Err(err) => {
            tracing::warn!(title = %book.title, error = %err, "open failed");
            CatalogEvent::OpenFailed(format!("Cannot open book: {err}"))
        }
    }
}

pub async fn sync_folder<S: CatalogService>(service: &S, folder_path: &str) -> Vec<CatalogEvent> {
    match service.sync_from_folder(folder_path).await {
        Ok(summary) => {
            tracing::info!(
                folder = folder_path,
                added = summary.books_added,
                found = summary.total_books_found,
                "folder synced"
            );
            vec![CatalogEvent::Synced(summary), load(service).await]
        }
        Err(err) => {
            tracing::warn!(folder = folder_path, error = %err, "folder sync failed");
            vec![CatalogEvent::SyncFailed(err.to_string())]
        }
    }
}

pub async fn books_folder<S: CatalogService>(service: &S) -> Option<CatalogEvent> {
    match service.books_folder().await {
        Ok(folder) => Some(CatalogEvent::FolderResolved(folder)),
        Err(err) => {
            tracing::warn!(error = %err, "could not read configured books folder");
            None
        }
    }
}
