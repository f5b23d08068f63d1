//! Error types for the session layer.

use buecheria_store::StoreError;

/// Errors that can occur while reading or writing the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A token is stored but one of the identity fields is missing.
    /// The `&'static str` names the missing key.
    #[error("stored session is missing {0}")]
    Incomplete(&'static str),

    /// A role string that is neither `Member` nor `Admin`.
    #[error("unknown role: {0:?}")]
    InvalidRole(String),
}
