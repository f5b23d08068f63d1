//! Client configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::ApiError;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "BUECHERIA_API_URL";
/// Environment variable overriding [`ApiConfig::crud_auth`].
pub const CRUD_AUTH_ENV: &str = "BUECHERIA_CRUD_AUTH";

// ---------------------------------------------------------------------------
// CrudAuth
// ---------------------------------------------------------------------------

/// Whether CRUD calls (authors, books, members, loans) carry the session
/// token.
///
/// Login and the `/protected` / `/adminonly` checks always go through the
/// authenticated pipeline; this only decides the resource endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrudAuth {
    /// Send CRUD requests without a token. The deployed API serves its
    /// resource routes without authentication, so this is the default.
    #[default]
    Anonymous,

    /// Route every CRUD request through
    /// [`authenticated_request`](crate::ApiClient::authenticated_request):
    /// no session means [`ApiError::NotAuthenticated`], and a 401 logs out.
    Bearer,
}

impl FromStr for CrudAuth {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anonymous" => Ok(Self::Anonymous),
            "bearer" => Ok(Self::Bearer),
            other => Err(ApiError::Config(format!(
                "{CRUD_AUTH_ENV} must be `anonymous` or `bearer`, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for CrudAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Bearer => write!(f, "bearer"),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Configuration for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to. May carry a path
    /// prefix: with `http://host/api`, the login endpoint is
    /// `http://host/api/login`.
    pub base_url: String,

    /// Token attachment for CRUD endpoints.
    pub crud_auth: CrudAuth,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            crud_auth: CrudAuth::default(),
            user_agent: concat!("buecheria-client/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl ApiConfig {
    /// Starts from [`Default`] and applies `BUECHERIA_API_URL` and
    /// `BUECHERIA_CRUD_AUTH` when they are set.
    ///
    /// # Errors
    /// [`ApiError::Config`] if `BUECHERIA_CRUD_AUTH` has an unknown value.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Ok(url) = env::var(BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Ok(mode) = env::var(CRUD_AUTH_ENV) {
            config.crud_auth = mode.parse()?;
        }
        Ok(config)
    }

    /// Returns the full URL for an endpoint path such as `/books/3`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
