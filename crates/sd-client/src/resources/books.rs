//! Book endpoints.

use sd_model::{Book, BookQuery, CreateBookRequest, Page, UpdateBookRequest};

use super::{segment, with_query};
use crate::api::ApiClient;
use crate::error::ClientResult;

/// Client for `/books`.
#[derive(Debug, Clone, Copy)]
pub struct BooksApi<'a> {
    api: &'a ApiClient,
}

impl<'a> BooksApi<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Lists books matching the filter.
    pub async fn list(&self, query: &BookQuery) -> ClientResult<Page<Book>> {
        self.api.get(&with_query("/books", &query.to_pairs())).await
    }

    /// Gets a book by ID.
    pub async fn get(&self, id: u64) -> ClientResult<Book> {
        self.api.get(&format!("/books/{id}")).await
    }

    /// Gets a book by ISBN.
    pub async fn by_isbn(&self, isbn: &str) -> ClientResult<Book> {
        self.api.get(&format!("/books/isbn/{}", segment(isbn))).await
    }

    /// Creates a book.
    pub async fn create(&self, request: &CreateBookRequest) -> ClientResult<Book> {
        self.api.post("/books", request).await
    }

    /// Updates a book, keeping the stored value of every field not given.
    pub async fn update(&self, id: u64, request: UpdateBookRequest) -> ClientResult<Book> {
        let current = self.get(id).await?;
        let full = request.merged_onto(&current);
        self.api.put(&format!("/books/{id}"), &full).await
    }

    /// Deletes a book.
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(&format!("/books/{id}")).await
    }
}
