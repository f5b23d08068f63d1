//! The session manager: reads and writes the current session.
//!
//! The manager holds no session state of its own. Every call goes to the
//! store, so managers over a shared store (a cloned `MemoryStore`, or
//! `FileStore`s on one path) see the same login state.
//!
//! # Concurrency note
//!
//! A token is read, then used, with no transaction around the two steps.
//! A logout that lands between the read and the server receiving the
//! request surfaces as an ordinary 401 on that request.

use buecheria_store::KeyValueStore;

use crate::{Role, Session, SessionError, SessionState};

/// Store key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Store key for the logged-in username.
pub const USERNAME_KEY: &str = "username";
/// Store key for the role (`Member` / `Admin`).
pub const ROLE_KEY: &str = "role";

/// Owns the zero-or-one current [`Session`] in a [`KeyValueStore`].
///
/// ## Lifecycle
///
/// ```text
/// set_session() ──→ [Authenticated] ──→ clear_session() ──→ [Unauthenticated]
/// ```
///
/// The token is written LAST and removed FIRST, so a crash or failed write
/// part-way through never leaves a token without its identity fields.
/// Concurrent `set_session` and `clear_session` calls are not ordered
/// against each other and can interleave into exactly that state;
/// [`current`](Self::current) reports it as [`SessionError::Incomplete`].
pub struct SessionManager<S> {
    store: S,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Creates a manager over `store`. Whatever session the store already
    /// holds (e.g. from a previous run) is the current session.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists a session, replacing any previous one.
    pub fn set_session(
        &self,
        token: &str,
        username: &str,
        role: Role,
    ) -> Result<(), SessionError> {
        self.store.set(USERNAME_KEY, username)?;
        self.store.set(ROLE_KEY, role.as_str())?;
        self.store.set(ACCESS_TOKEN_KEY, token)?;

        tracing::info!(%username, %role, "session stored");
        Ok(())
    }

    /// Returns the stored token, if any.
    pub fn get_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.store.get(ACCESS_TOKEN_KEY)?)
    }

    /// Removes all session fields. Calling this with no session stored is
    /// a no-op.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        let had_token = self.store.get(ACCESS_TOKEN_KEY)?.is_some();

        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(USERNAME_KEY)?;
        self.store.remove(ROLE_KEY)?;

        if had_token {
            tracing::info!("session cleared");
        }
        Ok(())
    }

    /// Returns `true` if a token is stored. The token is not validated.
    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.get_token()?.is_some())
    }

    /// Returns the current [`SessionState`].
    pub fn state(&self) -> Result<SessionState, SessionError> {
        Ok(if self.is_authenticated()? {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        })
    }

    /// Reads the full stored session.
    ///
    /// Returns `Ok(None)` when no token is stored.
    ///
    /// # Errors
    /// - [`SessionError::Incomplete`] — token present, identity missing
    /// - [`SessionError::InvalidRole`] — stored role doesn't parse
    pub fn current(&self) -> Result<Option<Session>, SessionError> {
        let Some(token) = self.get_token()? else {
            return Ok(None);
        };
        let username = self
            .store
            .get(USERNAME_KEY)?
            .ok_or(SessionError::Incomplete(USERNAME_KEY))?;
        let role: Role = self
            .store
            .get(ROLE_KEY)?
            .ok_or(SessionError::Incomplete(ROLE_KEY))?
            .parse()?;

        Ok(Some(Session {
            token,
            username,
            role,
        }))
    }
}

// =========================================================================
// Tests
// =========================================================================
