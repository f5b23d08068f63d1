//! Typed CRUD over the API's four resources.
//!
//! Each resource (authors, books, members, loans) is described by a
//! [`Resource`] impl: its path, its record type, and the payloads it
//! accepts. [`Resources`] then implements list/get/create/update/delete
//! once for all of them.

mod author;
mod book;
mod loan;
mod member;

use std::fmt;
use std::marker::PhantomData;

use buecheria_store::KeyValueStore;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ApiClient, ApiError, RequestOptions, ValidationError};

pub use author::{Author, AuthorDraft, AuthorId, AuthorPatch, Authors};
pub use book::{Book, BookDraft, BookId, BookPatch, Books};
pub use loan::{Loan, LoanDraft, LoanId, LoanPatch, Loans};
pub use member::{Member, MemberDraft, MemberId, MemberPatch, Members};

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

/// Client-side checks run before a draft is sent.
///
/// These mirror the required fields of the dashboard's forms. The server
/// still has the final word; this only saves a round trip for input that
/// is certainly wrong.
pub trait Validate {
    /// Returns the first problem found, if any.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Fails if `value` is empty or only whitespace.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Describes one REST resource.
pub trait Resource {
    /// Collection path, e.g. `/books`. Items live at `{PATH}/{id}`.
    const PATH: &'static str;

    /// Plural noun used in error messages (`"books"`).
    const PLURAL: &'static str;

    /// Singular noun used in error messages (`"book"`).
    const SINGULAR: &'static str;

    /// The resource's id newtype.
    type Id: fmt::Display + Copy + Send + Sync;

    /// What the API returns.
    type Record: DeserializeOwned + Send;

    /// The `POST` payload.
    type Draft: Serialize + Validate + Sync;

    /// The `PUT` payload. Absent fields are left unchanged by the API.
    type Patch: Serialize + Sync;
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// CRUD handle for resource `R`, borrowed from an [`ApiClient`].
///
/// Whether these calls carry the session token depends on the client's
/// [`CrudAuth`](crate::CrudAuth).
pub struct Resources<'a, R, S> {
    client: &'a ApiClient<S>,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource, S: KeyValueStore> Resources<'a, R, S> {
    pub(crate) fn new(client: &'a ApiClient<S>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn item_path(id: R::Id) -> String {
        format!("{}/{id}", R::PATH)
    }

    /// `GET {PATH}` — every record.
    pub async fn list(&self) -> Result<Vec<R::Record>, ApiError> {
        let response = self
            .client
            .dispatch(R::PATH, RequestOptions::new(Method::GET))
            .await?;
        self.client
            .read_json(response, &format!("Failed to fetch {}", R::PLURAL))
            .await
    }

    /// `GET {PATH}/{id}` — one record. A missing id is a 404
    /// [`ApiError::Request`].
    pub async fn get(&self, id: R::Id) -> Result<R::Record, ApiError> {
        let response = self
            .client
            .dispatch(&Self::item_path(id), RequestOptions::new(Method::GET))
            .await?;
        self.client
            .read_json(response, &format!("Failed to fetch {}", R::SINGULAR))
            .await
    }

    /// `POST {PATH}` — validates `draft`, then creates the record.
    ///
    /// # Errors
    /// [`ApiError::Validation`] if the draft fails [`Validate`]; nothing
    /// is sent in that case.
    pub async fn create(&self, draft: &R::Draft) -> Result<R::Record, ApiError> {
        draft.validate()?;
        let options = RequestOptions::new(Method::POST).json(draft)?;
        let response = self.client.dispatch(R::PATH, options).await?;
        let record = self
            .client
            .read_json(response, &format!("Failed to create {}", R::SINGULAR))
            .await?;
        tracing::info!(resource = R::SINGULAR, "created");
        Ok(record)
    }

    /// `PUT {PATH}/{id}` — applies `patch` and returns the updated record.
    pub async fn update(&self, id: R::Id, patch: &R::Patch) -> Result<R::Record, ApiError> {
        let options = RequestOptions::new(Method::PUT).json(patch)?;
        let response = self.client.dispatch(&Self::item_path(id), options).await?;
        let record = self
            .client
            .read_json(response, &format!("Failed to update {}", R::SINGULAR))
            .await?;
        tracing::info!(resource = R::SINGULAR, %id, "updated");
        Ok(record)
    }

    /// `DELETE {PATH}/{id}` — returns the record as it was before
    /// deletion (the API echoes it back).
    pub async fn delete(&self, id: R::Id) -> Result<R::Record, ApiError> {
        let response = self
            .client
            .dispatch(&Self::item_path(id), RequestOptions::new(Method::DELETE))
            .await?;
        let record = self
            .client
            .read_json(response, &format!("Failed to delete {}", R::SINGULAR))
            .await?;
        tracing::info!(resource = R::SINGULAR, %id, "deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("Title", "").is_err());
        assert!(require("Title", "   ").is_err());
        assert!(require("Title", "Faust").is_ok());
    }

    #[test]
    fn test_item_path_formats_id() {
        use buecheria_store::MemoryStore;
        assert_eq!(Resources::<Books, MemoryStore>::item_path(BookId(7)), "/books/7");
        assert_eq!(Resources::<Loans, MemoryStore>::item_path(LoanId(12)), "/loans/12");
    }
}
