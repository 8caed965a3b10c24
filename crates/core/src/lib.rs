//! Core domain types for the virtual library client.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Format tag the backend can render directly in its view endpoint.
pub const VIEWABLE_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// The backend hands out integer row ids; accept strings too.
impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => BookId(n.to_string()),
            Raw::Text(s) => BookId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub extension: String,
    pub path: String,
    #[serde(default, deserialize_with = "deserialize_read_flag")]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

impl Book {
    pub fn is_directly_viewable(&self) -> bool {
        self.extension
            .trim()
            .eq_ignore_ascii_case(VIEWABLE_EXTENSION)
    }

    pub fn read_label(&self) -> &'static str {
        if self.read { "Read" } else { "Unread" }
    }
}

fn deserialize_read_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => false,
        Some(Raw::Bool(b)) => b,
        Some(Raw::Int(n)) => n != 0,
        Some(Raw::Text(s)) => matches!(s.trim(), "1" | "true" | "True"),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub message: String,
    #[serde(default)]
    pub books_added: usize,
    #[serde(default)]
    pub total_books_found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Conversion responses are loosely shaped; keep the raw payload around.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertResult {
    pub message: Option<String>,
    pub pdf_path: Option<String>,
    pub raw: serde_json::Value,
}

impl ConvertResult {
    pub fn from_value(raw: serde_json::Value) -> Self {
        let field = |name: &str| raw.get(name).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            message: field("message"),
            pdf_path: field("pdf_path").or_else(|| field("path")),
            raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooksFolder {
    pub books_folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{}", describe_request(endpoint, *status, reason))]
    Request {
        endpoint: String,
        status: Option<u16>,
        reason: String,
    },
    #[error("no book matches title '{title}'")]
    NotFound { title: String },
}

fn describe_request(endpoint: &str, status: Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("{endpoint} returned {code}: {reason}"),
        None => format!("{endpoint} failed: {reason}"),
    }
}

impl CatalogError {
    pub fn request(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Request {
            endpoint: endpoint.into(),
            status: None,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKey {
    Id,
    Title,
}

impl MutationKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKey::Id => "id",
            MutationKey::Title => "title",
        }
    }
}

impl std::fmt::Display for MutationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MutationKey {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(MutationKey::Id),
            "title" => Ok(MutationKey::Title),
            _ => Err("unknown mutation key"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub mutation_key: MutationKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_command: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            mutation_key: MutationKey::Id,
            open_command: None,
        }
    }
}

impl Settings {
    pub fn normalize(&mut self) {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
        self.open_command = self
            .open_command
            .take()
            .map(|cmd| cmd.trim().to_string())
            .filter(|cmd| !cmd.is_empty());
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
