//! Client-side session management for Buecheria.
//!
//! A "session" is the client's proof of authentication: the bearer token
//! the API issued at login plus who it was issued to. This crate owns
//! where that proof lives and answers one question for the layers above:
//! "are we logged in?"
//!
//! # How it fits in the stack
//!
//! ```text
//! Client Layer (above)  ← logs in, attaches the token, logs out on 401
//!     ↕
//! Session Layer (this crate)  ← stores and reads the current session
//!     ↕
//! Store Layer (below)  ← any KeyValueStore (memory, file)
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::{SessionManager, ACCESS_TOKEN_KEY, ROLE_KEY, USERNAME_KEY};
pub use session::{Role, Session, SessionState};
