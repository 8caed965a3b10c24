use vlib_core::Book;

/// What the search box reports to the catalog.
///
/// `Cleared` means "show everything" and is distinct from `Results(vec![])`,
/// which means the search matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Results(Vec<Book>),
    Cleared,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchControl {
    query: String,
}

impl SearchControl {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn insert_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.query.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    pub fn clear_input(&mut self) {
        self.query.clear();
    }

    /// Returns the query to send, or `None` for blank input.
    pub fn submit(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(self.query.clone())
        }
    }

    pub fn clear(&mut self) -> SearchOutcome {
        self.query.clear();
        SearchOutcome::Cleared
    }
}
