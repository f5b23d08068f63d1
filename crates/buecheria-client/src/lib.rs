//! REST client for the Buecheria library API.
//!
//! This crate is what the dashboard talks through:
//!
//! 1. **Login** — exchanging credentials for a [`Session`]
//!    ([`ApiClient::login`])
//! 2. **Authenticated requests** — attaching the bearer token and logging
//!    out when the server rejects it ([`ApiClient::authenticated_request`])
//! 3. **Resources** — typed CRUD over authors, books, members and loans
//!    ([`Resources`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Application (above)  ← forms, lists, dashboards
//!     ↕
//! Client Layer (this crate)  ← HTTP, error messages, token attachment
//!     ↕
//! Session Layer (below)  ← who is logged in
//! ```
//!
//! [`Session`]: buecheria_session::Session

mod client;
mod config;
mod error;
mod message;
mod resources;

pub use client::{ApiClient, ApiClientBuilder, DashboardCounts, RequestOptions};
pub use config::{ApiConfig, CrudAuth};
pub use error::{ApiError, ValidationError};
pub use resources::{
    Author, AuthorDraft, AuthorId, AuthorPatch, Authors, Book, BookDraft,
    BookId, BookPatch, Books, Loan, LoanDraft, LoanId, LoanPatch, Loans,
    Member, MemberDraft, MemberId, MemberPatch, Members, Resource, Resources,
    Validate,
};
