use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ClientError;
use super::identity::Session;
use crate::auth::INVALID_CREDENTIALS;
use crate::models::{LoginResponse, UserProfile};

/// The shared request channel. Every request passes two stages around one
/// execution function:
///
/// - outbound: the token slot is read at send time and, if occupied,
///   attached as a bearer credential;
/// - inbound: a 401 response triggers the full session teardown before the
///   failure reaches the caller. Other responses pass through unchanged.
///
/// No request issued through this client bypasses either stage.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Runs one request through both stages.
    ///
    /// The bearer token is captured here, synchronously at send time; a slot
    /// cleared while a response is in flight never affects the request that
    /// already captured it.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let request = match self.session.tokens().get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // The server revoked the session. Tear down before the caller
            // observes the failure, so no stale authenticated state can be
            // rendered afterwards.
            self.session.clear();
            return Err(ClientError::Unauthorized);
        }

        Ok(response)
    }

    /// Submits a login attempt; on success the issued token is persisted.
    ///
    /// The server answers bad credentials with 401, which the inbound stage
    /// maps to `Unauthorized`; here that becomes `InvalidCredentials` with
    /// the fixed user-facing message for the login form.
    pub async fn login(&self, email: &str, secret: &str) -> Result<UserProfile, ClientError> {
        let body = serde_json::json!({ "email": email, "password": secret });
        let request = self.http.post(self.url("/login")).json(&body);

        match self.execute(request).await {
            Ok(response) if response.status().is_success() => {
                let login: LoginResponse = response.json().await?;
                self.session.tokens().set(Some(&login.token))?;
                Ok(login.user)
            }
            Ok(response) => Err(ClientError::UnexpectedStatus(response.status())),
            Err(ClientError::Unauthorized) => {
                Err(ClientError::InvalidCredentials(INVALID_CREDENTIALS.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// The who-am-i operation.
    pub async fn current_user(&self) -> Result<UserProfile, ClientError> {
        let response = self.execute(self.http.get(self.url("/users/current"))).await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClientError::UnexpectedStatus(response.status()))
        }
    }

    /// Ends the session: best-effort server-side revocation, then the local
    /// teardown. The local state is cleared even if the revoke call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.execute(self.http.post(self.url("/logout"))).await {
            debug!("Logout revocation not confirmed: {}", e);
        }
        self.session.clear();
    }

    /// Fetches a collaborator resource as JSON through both stages.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.execute(self.http.get(self.url(path))).await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClientError::UnexpectedStatus(response.status()))
        }
    }
}
