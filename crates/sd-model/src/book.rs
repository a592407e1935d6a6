//! Book records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::PageQuery;

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Backend identifier.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// ISBN, unique across the catalogue.
    pub isbn: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookRequest {
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// ISBN.
    pub isbn: String,
}

/// Body of `PUT /books/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// New ISBN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl UpdateBookRequest {
    /// Fills every absent field from `current`.
    ///
    /// The backend validates updates as full records, so partial edits are
    /// merged onto the stored book before sending.
    #[must_use]
    pub fn merged_onto(self, current: &Book) -> CreateBookRequest {
        CreateBookRequest {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            author: self.author.unwrap_or_else(|| current.author.clone()),
            isbn: self.isbn.unwrap_or_else(|| current.isbn.clone()),
        }
    }
}

/// Filter for `GET /books`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    /// Pagination.
    pub page: PageQuery,
    /// Title filter.
    pub title: Option<String>,
    /// Author filter.
    pub author: Option<String>,
}

impl BookQuery {
    /// Query parameters in wire order, values unencoded.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_string()));
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            pairs.push(("author", author.to_string()));
        }
        pairs.extend(self.page.to_pairs());
        pairs
    }
}
