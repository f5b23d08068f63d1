//! Session types: what the client knows about who is logged in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SessionError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The privilege level attached to a session (and a member's
/// `MembershipStatus`).
///
/// Serialized as `"Member"` / `"Admin"`. Parsing is case-insensitive
/// because the login endpoint reports roles in lowercase (`"admin"`), and
/// it accepts `"user"` as a synonym for `Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    /// Returns the canonical spelling (`"Member"` / `"Admin"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Admin => "Admin",
        }
    }

    /// Returns `true` for [`Role::Admin`].
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" | "user" => Ok(Self::Member),
            _ => Err(SessionError::InvalidRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A logged-in identity.
///
/// Built from a successful login response and persisted through
/// [`SessionManager::set_session`](crate::SessionManager::set_session).
/// There is no expiry field: a stored token is assumed valid until the
/// server rejects it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token issued by the API.
    pub token: String,

    /// The name the API reported for this login.
    pub username: String,

    /// Privilege level reported by the API.
    pub role: Role,
}

/// Hand-written so the token never ends up in logs or panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The two-state machine the client moves through:
///
/// ```text
///   Unauthenticated ──(login + set_session)──→ Authenticated
///          ↑                                        │
///          └──────(clear_session / 401 response)────┘
/// ```
///
/// Only token presence decides the state. Whether the token is still
/// accepted is found out at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token stored.
    Unauthenticated,

    /// A token is stored.
    Authenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("MEMBER".parse::<Role>().unwrap(), Role::Member);
    }

    #[test]
    fn test_role_from_str_user_means_member() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::Member);
    }

    #[test]
    fn test_role_from_str_unknown_returns_error() {
        let result = "superuser".parse::<Role>();
        assert!(
            matches!(result, Err(SessionError::InvalidRole(ref s)) if s == "superuser")
        );
    }

    #[test]
    fn test_role_serde_uses_canonical_spelling() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Admin\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"guest\"").is_err());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session {
            token: "abc123".into(),
            username: "admin".into(),
            role: Role::Admin,
        };
        let printed = format!("{session:?}");
        assert!(!printed.contains("abc123"));
        assert!(printed.contains("admin"));
    }
}
