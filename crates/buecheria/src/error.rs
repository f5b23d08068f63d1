//! Unified error type for the Buecheria client.

use buecheria_client::ApiError;
use buecheria_session::SessionError;
use buecheria_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// Applications built on the `buecheria` facade can return this one type
/// and let `?` convert store, session and API errors into it.
#[derive(Debug, thiserror::Error)]
pub enum BuecheriaError {
    /// The session store failed (I/O, corrupt file).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored session is unusable.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A call to the API failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl BuecheriaError {
    /// Returns `true` if the user has to log in (again) before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Api(err) if err.requires_login())
    }
}
