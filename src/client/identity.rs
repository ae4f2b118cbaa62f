use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use super::api::ApiClient;
use super::error::ClientError;
use super::navigator::{Navigator, LOGIN_ROUTE};
use super::token_store::TokenStore;
use crate::models::UserProfile;

/// The published identity state. `Resolved(None)` is the unauthenticated
/// steady state; `Failed` covers fetch failures that are not authentication
/// rejections and does not tear the session down.
#[derive(Clone, Debug, PartialEq)]
pub enum IdentityState {
    Idle,
    Loading,
    Resolved(Option<UserProfile>),
    Failed(String),
}

/// The client's session: the durable token slot, the identity channel and
/// the navigation sink.
///
/// Single-writer by construction: only this type (via the api client and
/// the identity provider) publishes identity states or mutates the token
/// slot. UI consumers hold read-only watch receivers.
pub struct Session {
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
    tx: watch::Sender<IdentityState>,
    // Held so the channel stays open with zero subscribers.
    rx: watch::Receiver<IdentityState>,
}

impl Session {
    pub fn new(tokens: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        let (tx, rx) = watch::channel(IdentityState::Idle);
        Session {
            tokens,
            navigator,
            tx,
            rx,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// A read-only subscription to the identity state.
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.rx.clone()
    }

    pub fn current(&self) -> IdentityState {
        self.rx.borrow().clone()
    }

    pub(crate) fn publish(&self, state: IdentityState) {
        self.tx.send_replace(state);
    }

    /// Forced de-authentication, in contract order: publish the
    /// unauthenticated identity, clear the token slot, then navigate to the
    /// login entry point. Idempotent; safe to run on an already-cleared
    /// session.
    pub fn clear(&self) {
        self.publish(IdentityState::Resolved(None));
        if let Err(e) = self.tokens.set(None) {
            // Teardown must proceed; the cached slot is already absent.
            warn!("Failed to remove persisted token: {}", e);
        }
        self.navigator.go(LOGIN_ROUTE);
    }
}

/// Fetches the current user once a token exists and publishes the outcome
/// to every identity subscriber.
pub struct IdentityProvider {
    api: ApiClient,
}

impl IdentityProvider {
    pub fn new(api: ApiClient) -> Self {
        IdentityProvider { api }
    }

    /// One `Loading -> {Resolved, Failed}` pass. No retry loop; calling
    /// `load` again is the retry.
    ///
    /// An authentication rejection has already been handled by the inbound
    /// stage, so it lands as the unauthenticated resolved state rather than
    /// as a failure.
    pub async fn load(&self) -> IdentityState {
        let session = self.api.session();
        session.publish(IdentityState::Loading);

        let state = match self.api.current_user().await {
            Ok(user) => IdentityState::Resolved(Some(user)),
            Err(ClientError::Unauthorized) => IdentityState::Resolved(None),
            Err(e) => IdentityState::Failed(e.to_string()),
        };

        session.publish(state.clone());
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::navigator::RecordingNavigator;
    use mockito::Server;

    fn temp_slot() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("passage-identity-{}", uuid::Uuid::new_v4()))
    }

    fn build_client(base_url: &str) -> (ApiClient, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(Session::new(
            TokenStore::new(temp_slot()),
            navigator.clone(),
        ));
        (ApiClient::new(base_url, session), navigator)
    }

    /// Sessions start in the idle state and fan identity out to every
    /// subscriber.
    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let session = Session::new(
            TokenStore::new(temp_slot()),
            Arc::new(RecordingNavigator::new()),
        );
        let subscriber = session.subscribe();
        assert_eq!(*subscriber.borrow(), IdentityState::Idle);

        session.publish(IdentityState::Loading);
        assert_eq!(*subscriber.borrow(), IdentityState::Loading);
        assert_eq!(session.current(), IdentityState::Loading);
    }

    /// Clearing twice is harmless and leaves the unauthenticated state.
    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Session::new(TokenStore::new(temp_slot()), navigator.clone());
        session.tokens().set(Some("tok")).unwrap();

        session.clear();
        session.clear();

        assert!(session.tokens().get().is_none());
        assert_eq!(session.current(), IdentityState::Resolved(None));
        assert_eq!(navigator.visited(), vec!["/login", "/login"]);
    }

    /// A successful who-am-i resolves the identity for all subscribers.
    #[tokio::test]
    async fn test_load_resolves_user() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/current")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "u1", "email": "a@x.com", "name": "Alice"}"#)
            .create_async()
            .await;

        let (api, _) = build_client(&server.url());
        api.session().tokens().set(Some("tok")).unwrap();
        let subscriber = api.session().subscribe();

        let provider = IdentityProvider::new(api);
        let state = provider.load().await;
        m.assert_async().await;

        match &state {
            IdentityState::Resolved(Some(user)) => assert_eq!(user.email, "a@x.com"),
            other => panic!("expected a resolved user, got {:?}", other),
        }
        assert_eq!(*subscriber.borrow(), state);
    }

    /// An authentication rejection lands as the unauthenticated resolved
    /// state; the failure path is reserved for everything else.
    #[tokio::test]
    async fn test_load_with_revoked_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/current")
            .with_status(401)
            .with_body(r#"{"error": "Unauthorised"}"#)
            .create_async()
            .await;

        let (api, navigator) = build_client(&server.url());
        api.session().tokens().set(Some("stale")).unwrap();
        let session = api.session().clone();

        let provider = IdentityProvider::new(api);
        let state = provider.load().await;
        m.assert_async().await;

        assert_eq!(state, IdentityState::Resolved(None));
        assert!(session.tokens().get().is_none());
        assert_eq!(navigator.visited(), vec!["/login"]);
    }

    /// A non-authentication failure is published as Failed and keeps the
    /// session intact.
    #[tokio::test]
    async fn test_load_failure_keeps_session() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/current")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let (api, navigator) = build_client(&server.url());
        api.session().tokens().set(Some("tok")).unwrap();
        let session = api.session().clone();

        let provider = IdentityProvider::new(api);
        let state = provider.load().await;
        m.assert_async().await;

        assert!(matches!(state, IdentityState::Failed(_)));
        assert_eq!(session.tokens().get().as_deref(), Some("tok"));
        assert!(navigator.visited().is_empty());
    }
}
