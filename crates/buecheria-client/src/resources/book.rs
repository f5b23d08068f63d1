//! Books.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Author, AuthorId, Resource, Validate, require};
use crate::ValidationError;

/// A book's id (`BookID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A book as returned by the API.
///
/// Apart from the id, the API may leave any field null, so they are all
/// optional here. `author` is the nested author record when the API
/// joined it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    #[serde(rename = "BookID")]
    pub id: BookId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "AuthorID", default)]
    pub author_id: Option<AuthorId>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "author", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl Book {
    /// Books are available unless the API says otherwise.
    pub fn is_available(&self) -> bool {
        self.available.unwrap_or(true)
    }
}

/// Payload for creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookDraft {
    pub title: String,
    #[serde(rename = "AuthorID")]
    pub author_id: AuthorId,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl Validate for BookDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Title", &self.title)?;
        require("Isbn", &self.isbn)?;
        require("Genre", &self.genre)?;
        if let Some(url) = &self.cover_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::new("CoverUrl", "must be an http(s) URL"));
            }
        }
        Ok(())
    }
}

/// Payload for updating a book. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "AuthorID", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl From<BookDraft> for BookPatch {
    fn from(draft: BookDraft) -> Self {
        Self {
            title: Some(draft.title),
            author_id: Some(draft.author_id),
            isbn: Some(draft.isbn),
            publication_date: Some(draft.publication_date),
            genre: Some(draft.genre),
            available: Some(draft.available),
            cover_url: draft.cover_url,
        }
    }
}

/// Marker for the `/books` resource.
pub struct Books;

impl Resource for Books {
    const PATH: &'static str = "/books";
    const PLURAL: &'static str = "books";
    const SINGULAR: &'static str = "book";
    type Id = BookId;
    type Record = Book;
    type Draft = BookDraft;
    type Patch = BookPatch;
}
