//! Authenticated HTTP client.
//!
//! Attaches the stored bearer token to every outgoing request. A 401
//! response triggers exactly one coalesced refresh (shared with the
//! proactive scheduler) and one replay of the original request; every other
//! status passes through unmodified.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api;
use crate::auth::AuthToken;
use crate::config::ClientConfig;
use crate::error::{FlagdeckError, Result};
use crate::session::{SessionEvent, SessionManager};

/// HTTP client for the admin API.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use flagdeck::auth::FileTokenStore;
/// use flagdeck::client::ApiClient;
/// use flagdeck::config::ClientConfig;
/// use flagdeck::session::SessionManager;
///
/// # async fn example() -> flagdeck::error::Result<()> {
/// let config = ClientConfig::new("https://api.flagdeck.example");
/// let session = Arc::new(SessionManager::new(&config, Arc::new(FileTokenStore::new_default()))?);
/// session.start();
/// let client = ApiClient::new(&config, session)?;
/// let projects = client.projects().list(Default::default()).await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        Ok(Self {
            http: config.build_http()?,
            base_url: config.base_url.clone(),
            session,
        })
    }

    /// Assemble from explicit parts (custom HTTP client, test servers).
    pub fn with_parts(
        base_url: impl Into<String>,
        http: reqwest::Client,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    /// The session manager backing this client.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    // Resource clients.

    pub fn organizations(&self) -> api::organizations::OrganizationsApi<'_> {
        api::organizations::OrganizationsApi::new(self)
    }

    pub fn projects(&self) -> api::projects::ProjectsApi<'_> {
        api::projects::ProjectsApi::new(self)
    }

    pub fn environments(&self) -> api::environments::EnvironmentsApi<'_> {
        api::environments::EnvironmentsApi::new(self)
    }

    pub fn features(&self) -> api::features::FeaturesApi<'_> {
        api::features::FeaturesApi::new(self)
    }

    pub fn experiments(&self) -> api::experiments::ExperimentsApi<'_> {
        api::experiments::ExperimentsApi::new(self)
    }

    pub fn goals(&self) -> api::goals::GoalsApi<'_> {
        api::goals::GoalsApi::new(self)
    }

    pub fn pushes(&self) -> api::pushes::PushesApi<'_> {
        api::pushes::PushesApi::new(self)
    }

    pub fn accounts(&self) -> api::accounts::AccountsApi<'_> {
        api::accounts::AccountsApi::new(self)
    }

    pub fn api_keys(&self) -> api::api_keys::ApiKeysApi<'_> {
        api::api_keys::ApiKeysApi::new(self)
    }

    pub fn segments(&self) -> api::segments::SegmentsApi<'_> {
        api::segments::SegmentsApi::new(self)
    }

    pub fn notifications(&self) -> api::notifications::NotificationsApi<'_> {
        api::notifications::NotificationsApi::new(self)
    }

    // Request plumbing used by the resource clients.

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let resp = self.execute(Method::GET, path, query, None).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let resp = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let resp = self.execute(Method::PATCH, path, &[], Some(body)).await?;
        Self::decode(resp).await
    }

    /// POST where the response body carries nothing of interest
    /// (enable/disable/archive style verb endpoints).
    pub(crate) async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        let resp = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::check(resp).await
    }

    pub(crate) async fn delete(&self, path: &str, query: &[(String, String)]) -> Result<()> {
        let resp = self.execute(Method::DELETE, path, query, None).await?;
        Self::check(resp).await
    }

    /// Send a request with the stored bearer token. On a 401, refresh once
    /// (coalesced) and replay once; the replay's outcome is returned as-is.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let token = self.session.token()?;
        let resp = self
            .send_once(&method, path, query, body.as_ref(), token.as_ref())
            .await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }
        if token.is_none() {
            // Never authenticated: nothing to refresh.
            self.session.events().emit(SessionEvent::Unauthenticated);
            return Err(FlagdeckError::Unauthenticated);
        }
        tracing::debug!(%method, path, "got 401; refreshing and replaying");
        let fresh = self.session.refresh_now().await?;
        self.send_once(&method, path, query, body.as_ref(), Some(&fresh))
            .await
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
        token: Option<&AuthToken>,
    ) -> Result<reqwest::Response> {
        let mut req = self
            .http
            .request(method.clone(), format!("{}{path}", self.base_url));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, token.authorization_value());
        }
        Ok(req.send().await?)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        Err(Self::error_for(status, resp.text().await.unwrap_or_default()))
    }

    async fn check(resp: reqwest::Response) -> Result<()> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_for(status, resp.text().await.unwrap_or_default()))
    }

    fn error_for(status: StatusCode, body: String) -> FlagdeckError {
        if status == StatusCode::UNAUTHORIZED {
            // A 401 on the replay: the fresh token was rejected too.
            return FlagdeckError::Unauthenticated;
        }
        let message = extract_error_message(&body).unwrap_or(body);
        FlagdeckError::api(status.as_u16(), message)
    }
}

/// Pull a human-readable message out of an API error body, which is either
/// `{"error": {"message": ...}}` or `{"message": ...}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
