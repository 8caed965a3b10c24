//! Test helpers and fixtures.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use vlib_application::CatalogService;
use vlib_core::{
    Book, BookId, CatalogError, ConvertResult, Message, MutationKey, SearchResults, Settings,
    SyncSummary,
};

pub const TEST_BASE_URL: &str = "http://library.test";

pub fn make_settings(base_url: &str) -> Settings {
    Settings {
        base_url: base_url.to_string(),
        request_timeout_secs: 10,
        mutation_key: MutationKey::Id,
        open_command: None,
    }
}

pub fn make_book(id: u32, title: &str, extension: &str, read: bool) -> Book {
    Book {
        id: BookId(id.to_string()),
        title: title.to_string(),
        extension: extension.to_string(),
        path: format!("/library/{title}{extension}"),
        read,
        added_at: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAll,
    Search(String),
    SyncFromFolder(String),
    ToggleRead(BookId),
    Remove(BookId),
    Convert(String),
    BooksFolder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListAll,
    Search,
    SyncFromFolder,
    ToggleRead,
    Remove,
    Convert,
    BooksFolder,
}

#[derive(Debug, Default)]
struct State {
    books: Vec<Book>,
    folder: String,
    calls: Vec<Call>,
    failing: HashSet<Operation>,
    queued_lists: VecDeque<Result<Vec<Book>, CatalogError>>,
}

/// In-memory backend that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingService {
    state: Mutex<State>,
}

impl RecordingService {
    pub fn with_books(books: Vec<Book>) -> Self {
        let service = Self::default();
        service.lock().books = books;
        service
    }

    pub fn with_folder(self, folder: &str) -> Self {
        self.lock().folder = folder.to_string();
        self
    }

    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Next `list_all` returns this instead of the live book set.
    pub fn queue_list(&self, result: Result<Vec<Book>, CatalogError>) {
        self.lock().queued_lists.push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn books(&self) -> Vec<Book> {
        self.lock().books.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(
        &self,
        call: Call,
        operation: Operation,
    ) -> Result<std::sync::MutexGuard<'_, State>, CatalogError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(CatalogError::Request {
                endpoint: format!("{operation:?}"),
                status: Some(500),
                reason: "injected failure".to_string(),
            });
        }
        Ok(state)
    }
}

impl CatalogService for RecordingService {
    async fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
        let mut state = self.record(Call::ListAll, Operation::ListAll)?;
        match state.queued_lists.pop_front() {
            Some(result) => result,
            None => Ok(state.books.clone()),
        }
    }

    async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        let state = self.record(Call::Search(query.to_string()), Operation::Search)?;
        let needle = query.to_lowercase();
        let books: Vec<Book> = state
            .books
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(SearchResults {
            count: books.len(),
            books,
        })
    }

    async fn sync_from_folder(&self, folder_path: &str) -> Result<SyncSummary, CatalogError> {
        let state = self.record(
            Call::SyncFromFolder(folder_path.to_string()),
            Operation::SyncFromFolder,
        )?;
        Ok(SyncSummary {
            message: "Added 0 books to Database.".to_string(),
            books_added: 0,
            total_books_found: state.books.len(),
        })
    }

    async fn toggle_read(&self, book: &Book) -> Result<Message, CatalogError> {
        let mut state = self.record(Call::ToggleRead(book.id.clone()), Operation::ToggleRead)?;
        let Some(stored) = state.books.iter_mut().find(|b| b.id == book.id) else {
            return Err(CatalogError::Request {
                endpoint: format!("PATCH /books/{}/read", book.id),
                status: Some(404),
                reason: format!("Book '{}' not found", book.id),
            });
        };
        stored.read = !stored.read;
        Ok(Message {
            message: format!("Book '{}' read", book.title),
        })
    }

    async fn remove(&self, book: &Book) -> Result<Message, CatalogError> {
        let mut state = self.record(Call::Remove(book.id.clone()), Operation::Remove)?;
        state.books.retain(|b| b.id != book.id);
        Ok(Message {
            message: format!("Book '{}' deleted", book.title),
        })
    }

    async fn convert(&self, file_path: &str) -> Result<ConvertResult, CatalogError> {
        let _state = self.record(Call::Convert(file_path.to_string()), Operation::Convert)?;
        let stem = file_path
            .rsplit_once('.')
            .map_or(file_path, |(stem, _)| stem);
        Ok(ConvertResult::from_value(serde_json::json!({
            "message": "converted",
            "pdf_path": format!("{stem}_converted.pdf"),
        })))
    }

    async fn books_folder(&self) -> Result<String, CatalogError> {
        let state = self.record(Call::BooksFolder, Operation::BooksFolder)?;
        Ok(state.folder.clone())
    }

    fn view_url(&self, title: &str) -> String {
        format!("{TEST_BASE_URL}/books/{title}/view")
    }
}

#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_settings() {
        let settings = make_settings(TEST_BASE_URL);
        assert_eq!(settings.base_url, TEST_BASE_URL);
        assert_eq!(settings.mutation_key, MutationKey::Id);
    }
}
