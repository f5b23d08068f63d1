//! # Buecheria
//!
//! Client library for the Buecheria library-management API.
//!
//! The crate is a thin facade over three layers:
//!
//! - [`buecheria_store`]: where the session lives ([`MemoryStore`],
//!   [`FileStore`], or your own [`KeyValueStore`]).
//! - [`buecheria_session`]: the session gate (token, username, role).
//! - [`buecheria_client`]: login, the authenticated request pipeline and
//!   typed CRUD for authors, books, members and loans.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use buecheria::prelude::*;
//!
//! # async fn run() -> Result<(), BuecheriaError> {
//! buecheria::init_logging();
//!
//! let client = ApiClientBuilder::new()
//!     .base_url("http://localhost:8000/api")
//!     .build(FileStore::open("session.json")?)?;
//!
//! if !client.is_authenticated()? {
//!     let session = client.login("admin", "adminpassword").await?;
//!     client.set_session(&session.token, &session.username, session.role)?;
//! }
//!
//! for book in client.books().list().await? {
//!     println!("{:?}", book.title);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;

pub use error::BuecheriaError;
pub use logging::init_logging;

pub use buecheria_client as client;
pub use buecheria_session as session;
pub use buecheria_store as store;

pub use buecheria_client::{
    ApiClient, ApiClientBuilder, ApiConfig, ApiError, CrudAuth, DashboardCounts,
    RequestOptions, ValidationError,
};
pub use buecheria_session::{Role, Session, SessionError, SessionManager, SessionState};
pub use buecheria_store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Everything needed for typical use, in one import.
pub mod prelude {
    pub use crate::BuecheriaError;
    pub use buecheria_client::{
        ApiClient, ApiClientBuilder, ApiConfig, ApiError, Author, AuthorDraft, AuthorId,
        AuthorPatch, Book, BookDraft, BookId, BookPatch, CrudAuth, DashboardCounts, Loan,
        LoanDraft, LoanId, LoanPatch, Member, MemberDraft, MemberId, MemberPatch,
        RequestOptions,
    };
    pub use buecheria_session::{Role, Session, SessionState};
    pub use buecheria_store::{FileStore, KeyValueStore, MemoryStore};
}
