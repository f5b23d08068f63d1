//! Authors.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Resource, Validate, require};
use crate::ValidationError;

/// An author's id (`AuthorID`). Serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub i64);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An author as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Author {
    #[serde(rename = "AuthorID")]
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

impl Author {
    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorDraft {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

impl Validate for AuthorDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("FirstName", &self.first_name)?;
        require("LastName", &self.last_name)
    }
}

/// Payload for updating an author. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl From<AuthorDraft> for AuthorPatch {
    fn from(draft: AuthorDraft) -> Self {
        Self {
            first_name: Some(draft.first_name),
            last_name: Some(draft.last_name),
            birth_date: Some(draft.birth_date),
        }
    }
}

/// Marker for the `/authors` resource.
pub struct Authors;

impl Resource for Authors {
    const PATH: &'static str = "/authors";
    const PLURAL: &'static str = "authors";
    const SINGULAR: &'static str = "author";
    type Id = AuthorId;
    type Record = Author;
    type Draft = AuthorDraft;
    type Patch = AuthorPatch;
}
