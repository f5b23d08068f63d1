//! Error types for the client layer.
//!
//! The variants follow what a caller (a form handler, a page loader) has
//! to do about the failure:
//!
//! | Variant | Meaning | Typical reaction |
//! |---|---|---|
//! | `Connectivity` | server unreachable | "is the backend running?" |
//! | `Auth` | login rejected | show the message on the login form |
//! | `AuthExpired` | token rejected mid-use | send the user to login |
//! | `NotAuthenticated` | no token stored | send the user to login |
//! | `Request` | any other non-2xx | show the message inline |

use buecheria_session::SessionError;

/// Errors returned by [`ApiClient`](crate::ApiClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never got a response: connection refused, DNS failure,
    /// connection reset.
    #[error(
        "Cannot connect to server at {url}. Please make sure the backend is running."
    )]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The login endpoint rejected the credentials. Carries the server's
    /// message when it sent one.
    #[error("{0}")]
    Auth(String),

    /// An authenticated request came back 401. The session has already
    /// been cleared when this is returned.
    #[error("Authentication failed. Please login again.")]
    AuthExpired,

    /// An authenticated request was attempted with no token stored.
    /// No network call was made.
    #[error("No authentication token found")]
    NotAuthenticated,

    /// The stored token contains characters that can't go into an HTTP
    /// header.
    #[error("stored token is not a valid header value")]
    InvalidToken,

    /// Any other non-2xx response. `message` follows the detail → text →
    /// status-line fallback.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// A 2xx response whose body didn't match the expected shape.
    #[error("unexpected response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A request body couldn't be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Bad configuration: unparseable base URL, unknown auth mode, HTTP
    /// client construction failure.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A draft failed client-side validation. No network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading or writing the session failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Returns the HTTP status for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }

    /// Returns `true` if the caller should send the user back to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthExpired | Self::NotAuthenticated)
    }
}

/// A draft rejected before it was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// The API field name (`"Email"`, `"DueDate"`, ...).
    pub field: &'static str,

    /// Why it was rejected.
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
