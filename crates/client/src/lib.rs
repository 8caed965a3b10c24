//! HTTP client for the virtual library backend.

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use vlib_application::CatalogService;
use vlib_core::{
    Book, BooksFolder, CatalogError, ConvertResult, Message, MutationKey, SearchResults, Settings,
    SyncSummary,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    mutation_key: MutationKey,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, CatalogError> {
        let mut settings = settings.clone();
        settings.normalize();
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| CatalogError::request("client setup", e.to_string()))?;
        Ok(Self {
            base_url: settings.base_url,
            mutation_key: settings.mutation_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn book_path(&self, book: &Book) -> String {
        match self.mutation_key {
            MutationKey::Id => format!("/books/{}", urlencoding::encode(&book.id.0)),
            MutationKey::Title => title_path(&book.title),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, CatalogError> {
        let endpoint = format!("{method} {path}");
        tracing::debug!(%endpoint, "request");
        let request = build(self.http.request(method, self.url(path)));
        let response = request.send().await.map_err(|e| {
            let err = transport_error(&endpoint, &e);
            tracing::warn!(error = %err, "request failed");
            err
        })?;
        let response = check_status(&endpoint, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::request(&endpoint, format!("invalid response body: {e}")))
    }

    pub async fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
        self.send(Method::GET, "/books", |r| r).await
    }

    pub async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        self.send(Method::GET, &title_path(query), |r| r).await
    }

    pub async fn sync_from_folder(&self, folder_path: &str) -> Result<SyncSummary, CatalogError> {
        let body = serde_json::json!({ "folder_path": folder_path });
        self.send(Method::POST, "/booksdb", |r| r.json(&body)).await
    }

    pub async fn toggle_read(&self, book: &Book) -> Result<Message, CatalogError> {
        let path = match self.mutation_key {
            MutationKey::Id => format!("{}/read", self.book_path(book)),
            MutationKey::Title => self.book_path(book),
        };
        self.send(Method::PATCH, &path, |r| r).await
    }

    pub async fn remove(&self, book: &Book) -> Result<Message, CatalogError> {
        self.send(Method::DELETE, &self.book_path(book), |r| r).await
    }

    pub async fn convert(&self, file_path: &str) -> Result<ConvertResult, CatalogError> {
        let body = serde_json::json!({ "file_path": file_path });
        let raw: serde_json::Value = self
            .send(Method::POST, "/books/convert", |r| r.json(&body))
            .await?;
        Ok(ConvertResult::from_value(raw))
    }

    pub async fn books_folder(&self) -> Result<String, CatalogError> {
        let folder: BooksFolder = self
            .send(Method::GET, "/config/books-folder", |r| r)
            .await?;
        Ok(folder.books_folder)
    }

    pub fn view_url(&self, title: &str) -> String {
        self.url(&format!("{}/view", title_path(title)))
    }
}

fn title_path(title: &str) -> String {
    format!("/books/{}", urlencoding::encode(title))
}

fn transport_error(endpoint: &str, err: &reqwest::Error) -> CatalogError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        err.to_string()
    };
    CatalogError::Request {
        endpoint: endpoint.to_string(),
        status: err.status().map(|s| s.as_u16()),
        reason,
    }
}

async fn check_status(endpoint: &str, response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    let err = CatalogError::Request {
        endpoint: endpoint.to_string(),
        status: Some(status.as_u16()),
        reason,
    };
    tracing::warn!(error = %err, "request rejected");
    Err(err)
}

impl CatalogService for ApiClient {
    async fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
        ApiClient::list_all(self).await
    }

    async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        ApiClient::search(self, query).await
    }

    async fn sync_from_folder(&self, folder_path: &str) -> Result<SyncSummary, CatalogError> {
        ApiClient::sync_from_folder(self, folder_path).await
    }

    async fn toggle_read(&self, book: &Book) -> Result<Message, CatalogError> {
        ApiClient::toggle_read(self, book).await
    }

    async fn remove(&self, book: &Book) -> Result<Message, CatalogError> {
        ApiClient::remove(self, book).await
    }

    async fn convert(&self, file_path: &str) -> Result<ConvertResult, CatalogError> {
        ApiClient::convert(self, file_path).await
    }

    async fn books_folder(&self) -> Result<String, CatalogError> {
        ApiClient::books_folder(self).await
    }

    fn view_url(&self, title: &str) -> String {
        ApiClient::view_url(self, title)
    }
}
