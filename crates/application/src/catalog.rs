use vlib_core::{Book, SyncSummary};

use crate::search::SearchOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error(String),
    Ready,
}

/// Results of background work, posted back to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    Loaded(Result<Vec<Book>, String>),
    Searched(SearchOutcome),
    Navigate(String),
    OpenFailed(String),
    Synced(SyncSummary),
    SyncFailed(String),
    FolderResolved(String),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub view_state: ViewState,
    pub all_books: Vec<Book>,
    pub displayed_books: Vec<Book>,
    pub is_searching: bool,
    pub selected: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            view_state: ViewState::Loading,
            all_books: Vec::new(),
            displayed_books: Vec::new(),
            is_searching: false,
            selected: 0,
        }
    }

    pub fn begin_load(&mut self) {
        self.view_state = ViewState::Loading;
    }

    /// Folds a catalog event into the state. Events that only concern the
    /// surrounding UI are handed back.
    pub fn apply(&mut self, event: CatalogEvent) -> Option<CatalogEvent> {
        match event {
            CatalogEvent::Loaded(Ok(books)) => {
                self.displayed_books = books.clone();
                self.all_books = books;
                self.is_searching = false;
                self.view_state = ViewState::Ready;
                self.clamp_selection();
                None
            }
            CatalogEvent::Loaded(Err(message)) => {
                self.all_books.clear();
                self.displayed_books.clear();
                self.is_searching = false;
                self.view_state = ViewState::Error(message);
                self.selected = 0;
                None
            }
            CatalogEvent::Searched(outcome) => {
                self.apply_search(outcome);
                None
            }
            other => Some(other),
        }
    }

    /// Results only land on a ready catalog; clearing works in every state.
    pub fn apply_search(&mut self, outcome: SearchOutcome) {
        match outcome {
            SearchOutcome::Cleared => {
                self.displayed_books = self.all_books.clone();
                self.is_searching = false;
            }
            SearchOutcome::Results(books) => {
                if !self.is_ready() {
                    return;
                }
                self.displayed_books = books;
                self.is_searching = true;
            }
        }
        self.selected = 0;
        self.clamp_selection();
    }

    pub fn can_refresh(&self) -> bool {
        !self.is_searching || !self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        self.view_state == ViewState::Ready
    }

    pub fn selected_book(&self) -> Option<&Book> {
        if !self.is_ready() {
            return None;
        }
        self.displayed_books.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.displayed_books.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.displayed_books.len().saturating_sub(1));
    }
}
