//! `ApiClient` builder, login, and the request pipeline.
//!
//! Every request goes through one of two paths:
//!
//! ```text
//! anonymous_request()      ──→ send ──→ Response
//! authenticated_request()  ──→ token? ──→ merge headers ──→ send ──→ 401? ──→ Response
//!                                 │                                   │
//!                                 ▼                                   ▼
//!                          NotAuthenticated                 clear_session + AuthExpired
//! ```
//!
//! Resource calls pick the path from [`CrudAuth`]. Nothing is retried and
//! no timeout is set: a failure is returned to the caller as it happens.

use std::sync::Arc;

use buecheria_session::{Role, Session, SessionManager};
use buecheria_store::KeyValueStore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::message::error_message;
use crate::resources::{Authors, Books, Loans, Members, Resources};
use crate::{ApiConfig, ApiError, CrudAuth};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body of a successful `POST /login`. The API also sends `token_type`,
/// which is always `bearer` and ignored here.
#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    username: String,
    role: String,
}

// ---------------------------------------------------------------------------
// RequestOptions
// ---------------------------------------------------------------------------

/// Method, headers and body for a single request.
///
/// Headers set here win over the ones the pipeline adds: a caller can
/// replace `Content-Type` (or even `Authorization`) for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method. Defaults to `GET`.
    pub method: Method,

    /// Extra headers, merged over the pipeline's headers.
    pub headers: HeaderMap,

    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    /// Options for a request with the given method and nothing else.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Adds (or replaces) a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    /// [`ApiError::Encode`] if `body` can't be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// DashboardCounts
// ---------------------------------------------------------------------------

/// Totals shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub books: usize,
    pub authors: usize,
    pub members: usize,
    pub loans: usize,
}

// ---------------------------------------------------------------------------
// ApiClientBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`ApiClient`].
///
/// # Example
///
/// ```rust,no_run
/// use buecheria_client::{ApiClientBuilder, CrudAuth};
/// use buecheria_store::MemoryStore;
///
/// let client = ApiClientBuilder::new()
///     .base_url("http://localhost:8000/api")
///     .crud_auth(CrudAuth::Bearer)
///     .build(MemoryStore::new())?;
/// # Ok::<(), buecheria_client::ApiError>(())
/// ```
pub struct ApiClientBuilder {
    config: ApiConfig,
}

impl ApiClientBuilder {
    /// Creates a builder with [`ApiConfig::default`].
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Creates a builder starting from an existing config.
    pub fn from_config(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    /// Sets token attachment for CRUD endpoints.
    pub fn crud_auth(mut self, mode: CrudAuth) -> Self {
        self.config.crud_auth = mode;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, agent: &str) -> Self {
        self.config.user_agent = agent.to_string();
        self
    }

    /// Builds the client. `store` holds the session; whatever session it
    /// already contains is picked up as-is.
    ///
    /// # Errors
    /// [`ApiError::Config`] if the base URL doesn't parse or the HTTP
    /// client can't be constructed.
    pub fn build<S: KeyValueStore>(self, store: S) -> Result<ApiClient<S>, ApiError> {
        let base = Url::parse(&self.config.base_url).map_err(|e| {
            ApiError::Config(format!("base URL {:?}: {e}", self.config.base_url))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base URL {:?} must be http or https",
                self.config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        tracing::debug!(
            base_url = %self.config.base_url,
            crud_auth = %self.config.crud_auth,
            "API client built"
        );

        Ok(ApiClient {
            http,
            config: Arc::new(self.config),
            sessions: Arc::new(SessionManager::new(store)),
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Client for the library API, holding the current session.
///
/// Cloning is cheap and every clone shares the same session: logging out
/// through one clone logs out all of them.
pub struct ApiClient<S> {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
    sessions: Arc<SessionManager<S>>,
}

impl<S> Clone for ApiClient<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: Arc::clone(&self.config),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S: KeyValueStore> ApiClient<S> {
    /// Returns the client's configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the session manager.
    pub fn sessions(&self) -> &SessionManager<S> {
        &self.sessions
    }

    // =====================================================================
    // Login / session
    // =====================================================================

    /// Exchanges credentials for a [`Session`].
    ///
    /// The session is NOT stored. Call [`set_session`](Self::set_session)
    /// with the result to log in.
    ///
    /// # Errors
    /// - [`ApiError::Auth`] — non-2xx; carries the server's message, or
    ///   `"Login failed: <status>"` when it sent none
    /// - [`ApiError::Connectivity`] — the server couldn't be reached
    /// - [`ApiError::InvalidResponse`] / [`ApiError::Session`] — 2xx with
    ///   a malformed body or an unknown role
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let url = self.config.endpoint("/login");
        tracing::debug!(%url, %username, "attempting login");

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|source| self.connectivity(source))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, "Login failed").await;
            tracing::warn!(%username, status = status.as_u16(), %message, "login rejected");
            return Err(ApiError::Auth(message));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|source| ApiError::InvalidResponse { url, source })?;
        let role: Role = body.role.parse()?;

        tracing::info!(username = %body.username, %role, "login succeeded");
        Ok(Session {
            token: body.access_token,
            username: body.username,
            role,
        })
    }

    /// Stores a session, replacing any previous one.
    pub fn set_session(&self, token: &str, username: &str, role: Role) -> Result<(), ApiError> {
        Ok(self.sessions.set_session(token, username, role)?)
    }

    /// Returns the stored token, if any.
    pub fn get_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.sessions.get_token()?)
    }

    /// Removes the stored session. Idempotent.
    pub fn clear_session(&self) -> Result<(), ApiError> {
        Ok(self.sessions.clear_session()?)
    }

    /// Explicit logout. Same as [`clear_session`](Self::clear_session).
    pub fn logout(&self) -> Result<(), ApiError> {
        self.clear_session()
    }

    /// Returns `true` if a token is stored. The token is not checked
    /// against the server.
    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.sessions.is_authenticated()?)
    }

    // =====================================================================
    // Request pipeline
    // =====================================================================

    /// Sends a request carrying the session's bearer token.
    ///
    /// `Content-Type: application/json` and `Authorization: Bearer <token>`
    /// are set first; headers in `options` then override them.
    ///
    /// Any response other than 401 is returned untouched, including other
    /// error statuses. The caller decides what those mean.
    ///
    /// # Errors
    /// - [`ApiError::NotAuthenticated`] — no token; nothing was sent
    /// - [`ApiError::AuthExpired`] — the server answered 401; the session
    ///   has been cleared (a store failure while clearing is logged, and
    ///   the error is still `AuthExpired`)
    /// - [`ApiError::Connectivity`] — the server couldn't be reached
    pub async fn authenticated_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        let Some(token) = self.sessions.get_token()? else {
            tracing::debug!(%path, "no session, refusing authenticated request");
            return Err(ApiError::NotAuthenticated);
        };

        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::InvalidToken)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, bearer);
        // `extend` replaces existing entries, so the caller's headers win.
        headers.extend(options.headers);

        let url = self.config.endpoint(path);
        let mut request = self.http.request(options.method.clone(), &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| self.connectivity(source))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(%url, "token rejected, clearing session");
            if let Err(err) = self.sessions.clear_session() {
                tracing::error!(error = %err, "failed to clear rejected session");
            }
            return Err(ApiError::AuthExpired);
        }

        tracing::debug!(method = %options.method, %url, status = response.status().as_u16(), "authenticated request");
        Ok(response)
    }

    /// Sends a request without any token.
    pub async fn anonymous_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);
        let mut request = self.http.request(options.method.clone(), &url).headers(options.headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| self.connectivity(source))?;
        tracing::debug!(method = %options.method, %url, status = response.status().as_u16(), "request");
        Ok(response)
    }

    /// Sends a resource request along the path [`CrudAuth`] selects.
    pub(crate) async fn dispatch(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        match self.config.crud_auth {
            CrudAuth::Anonymous => self.anonymous_request(path, options).await,
            CrudAuth::Bearer => self.authenticated_request(path, options).await,
        }
    }

    /// Decodes a 2xx body as `T`; turns anything else into
    /// [`ApiError::Request`] with the fallback message.
    pub(crate) async fn read_json<T: DeserializeOwned>(
        &self,
        response: Response,
        context: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, context).await;
            tracing::warn!(status = status.as_u16(), %message, "{context}");
            return Err(ApiError::Request {
                status: status.as_u16(),
                message,
            });
        }

        let url = response.url().to_string();
        response
            .json()
            .await
            .map_err(|source| ApiError::InvalidResponse { url, source })
    }

    fn connectivity(&self, source: reqwest::Error) -> ApiError {
        if source.is_builder() {
            return ApiError::Config(source.to_string());
        }
        tracing::error!(base_url = %self.config.base_url, error = %source, "server unreachable");
        ApiError::Connectivity {
            url: self.config.base_url.clone(),
            source,
        }
    }

    // =====================================================================
    // Access checks
    // =====================================================================

    /// `GET /protected`: succeeds for any valid session.
    pub async fn protected(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authenticated_request("/protected", RequestOptions::default())
            .await?;
        self.read_json(response, "Failed to access protected route").await
    }

    /// `GET /adminonly`: succeeds only for admin sessions (403 otherwise).
    pub async fn admin_only(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authenticated_request("/adminonly", RequestOptions::default())
            .await?;
        self.read_json(response, "Failed to access admin route").await
    }

    // =====================================================================
    // Resources
    // =====================================================================

    /// CRUD over `/authors`.
    pub fn authors(&self) -> Resources<'_, Authors, S> {
        Resources::new(self)
    }

    /// CRUD over `/books`.
    pub fn books(&self) -> Resources<'_, Books, S> {
        Resources::new(self)
    }

    /// CRUD over `/members`.
    pub fn members(&self) -> Resources<'_, Members, S> {
        Resources::new(self)
    }

    /// CRUD over `/loans`.
    pub fn loans(&self) -> Resources<'_, Loans, S> {
        Resources::new(self)
    }

    /// Fetches all four collections concurrently and counts them.
    ///
    /// The reads are independent; the first one to fail fails the whole
    /// call.
    pub async fn dashboard_counts(&self) -> Result<DashboardCounts, ApiError> {
        let (books, authors, members, loans) =
            (self.books(), self.authors(), self.members(), self.loans());
        let (books, authors, members, loans) =
            tokio::try_join!(books.list(), authors.list(), members.list(), loans.list())?;

        Ok(DashboardCounts {
            books: books.len(),
            authors: authors.len(),
            members: members.len(),
            loans: loans.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buecheria_store::MemoryStore;

    #[test]
    fn test_build_rejects_unparseable_base_url() {
        let result = ApiClientBuilder::new().base_url("not a url").build(MemoryStore::new());
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_build_rejects_non_http_scheme() {
        let result = ApiClientBuilder::new()
            .base_url("ftp://library.example")
            .build(MemoryStore::new());
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_clones_share_session() {
        let client = ApiClientBuilder::new().build(MemoryStore::new()).unwrap();
        let other = client.clone();

        client.set_session("abc123", "admin", Role::Admin).unwrap();
        assert!(other.is_authenticated().unwrap());

        other.logout().unwrap();
        assert!(!client.is_authenticated().unwrap());
    }

    #[test]
    fn test_request_options_header_replaces() {
        let options = RequestOptions::new(Method::POST)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        assert_eq!(options.headers.get(CONTENT_TYPE).unwrap(), "application/xml");
        assert_eq!(options.method, Method::POST);
    }

    #[test]
    fn test_request_options_json_sets_body() {
        let options = RequestOptions::default()
            .json(&serde_json::json!({"Title": "Faust"}))
            .unwrap();
        assert_eq!(options.body.unwrap()["Title"], "Faust");
    }
}
