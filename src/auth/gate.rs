use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::local::{LocalStrategy, LocalStrategyConfig};
use super::verifier::CredentialVerifier;
use crate::models::UserRecord;
use crate::store::Store;

/// The single user-facing rejection text. Unknown accounts and wrong
/// passwords are indistinguishable behind it.
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password.";

/// One submitted login attempt. Transient: lives for a single verification
/// call and is never persisted. Deliberately no Debug impl, so the secret
/// cannot end up in logs.
pub struct CredentialAttempt {
    pub email: String,
    pub secret: String,
}

/// The gate's three-way outcome. `Rejected` is user-correctable,
/// `Error` is a system fault and never blamed on the credentials.
pub enum AuthOutcome {
    Authenticated(UserRecord),
    Rejected(String),
    Error(String),
}

/// A credential-verification strategy must turn an attempt into an outcome.
/// Additional credential sources become new implementations, not new
/// branches in the gate.
#[async_trait::async_trait]
pub trait Strategy: Send + Sync {
    fn get_name(&self) -> &str;
    async fn verify(&self, attempt: &CredentialAttempt) -> AuthOutcome;
}

/// Configuration options for each strategy.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
#[serde(tag = "type")]
pub enum StrategyConfig {
    #[serde(rename = "local")]
    Local(LocalStrategyConfig),
}

/// Configuration for the authentication gate: which strategies to run and
/// which JSON body fields carry the credentials.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct GateConfig {
    pub strategies: Vec<StrategyConfig>,
    #[serde(default = "default_email_field")]
    pub email_field: String,
    #[serde(default = "default_password_field")]
    pub password_field: String,
}

fn default_email_field() -> String {
    "email".to_string()
}

fn default_password_field() -> String {
    "password".to_string()
}

/// Create a strategy from a given config.
pub fn create_strategy(config: &StrategyConfig, store: Arc<dyn Store>) -> Box<dyn Strategy> {
    match config {
        StrategyConfig::Local(cfg) => Box::new(LocalStrategy::new(
            cfg,
            CredentialVerifier::new(store),
        )),
    }
}

/// Holds the configured strategies and adapts their verdicts into one
/// pass/fail/error contract for the login route.
pub struct Gate {
    strategies: Vec<Box<dyn Strategy>>,
    email_field: String,
    password_field: String,
}

impl Gate {
    pub fn new(config: &GateConfig, store: Arc<dyn Store>) -> Self {
        info!("Creating auth strategies...");
        let strategies = config
            .strategies
            .iter()
            .map(|cfg| create_strategy(cfg, store.clone()))
            .collect();

        Gate {
            strategies,
            email_field: config.email_field.clone(),
            password_field: config.password_field.clone(),
        }
    }

    /// Pull the credential fields out of a login request body, using the
    /// configured field names.
    pub fn attempt_from_body(&self, body: &Value) -> Option<CredentialAttempt> {
        let email = body.get(&self.email_field).and_then(Value::as_str)?;
        let secret = body.get(&self.password_field).and_then(Value::as_str)?;
        if email.is_empty() {
            return None;
        }
        Some(CredentialAttempt {
            email: email.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Runs the attempt through each strategy in order. The first
    /// authentication wins. If none succeeds, a system fault in any
    /// strategy outranks a plain rejection, so the caller can tell
    /// "bad credentials" apart from "something broke".
    pub async fn authenticate(&self, attempt: &CredentialAttempt) -> AuthOutcome {
        let mut fault: Option<String> = None;

        for strategy in &self.strategies {
            match strategy.verify(attempt).await {
                AuthOutcome::Authenticated(user) => {
                    info!(
                        "Strategy '{}' authenticated user '{}'",
                        strategy.get_name(),
                        user.email
                    );
                    return AuthOutcome::Authenticated(user);
                }
                AuthOutcome::Rejected(_) => {}
                AuthOutcome::Error(cause) => {
                    warn!("Strategy '{}' failed: {}", strategy.get_name(), cause);
                    fault.get_or_insert(cause);
                }
            }
        }

        match fault {
            Some(cause) => AuthOutcome::Error(cause),
            None => AuthOutcome::Rejected(INVALID_CREDENTIALS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trip;
    use crate::store::memory_store::MemoryStore;
    use serde_json::json;

    /// A store whose every operation fails, to exercise the fault path.
    struct BrokenStore;

    #[async_trait::async_trait]
    impl Store for BrokenStore {
        async fn add_user(&self, _user: &UserRecord) -> Result<(), String> {
            Err("store offline".into())
        }
        async fn find_user_by_email(&self, _email: &str) -> Result<Option<UserRecord>, String> {
            Err("store offline".into())
        }
        async fn create_session(
            &self,
            _user: &UserRecord,
            _token: &str,
            _expires_at: i64,
        ) -> Result<(), String> {
            Err("store offline".into())
        }
        async fn user_for_session(&self, _token: &str) -> Result<Option<UserRecord>, String> {
            Err("store offline".into())
        }
        async fn revoke_session(&self, _token: &str) -> Result<(), String> {
            Err("store offline".into())
        }
        async fn add_trip(&self, _trip: &Trip) -> Result<(), String> {
            Err("store offline".into())
        }
        async fn trips_for_user(&self, _user_id: &str) -> Result<Vec<Trip>, String> {
            Err("store offline".into())
        }
    }

    fn local_gate_config() -> GateConfig {
        GateConfig {
            strategies: vec![StrategyConfig::Local(LocalStrategyConfig {
                name: "Local strategy".to_string(),
            })],
            email_field: default_email_field(),
            password_field: default_password_field(),
        }
    }

    async fn seeded_store() -> Arc<dyn Store> {
        let store = MemoryStore::new();
        let hash = bcrypt::hash("right", 4).unwrap();
        let user = UserRecord::new("a@x.com".to_string(), "Alice".to_string(), hash);
        store.add_user(&user).await.unwrap();
        Arc::new(store)
    }

    fn attempt(email: &str, secret: &str) -> CredentialAttempt {
        CredentialAttempt {
            email: email.to_string(),
            secret: secret.to_string(),
        }
    }

    /// Valid credentials pass the gate with the matching identity.
    #[tokio::test]
    async fn test_gate_authenticates() {
        let gate = Gate::new(&local_gate_config(), seeded_store().await);
        match gate.authenticate(&attempt("a@x.com", "right")).await {
            AuthOutcome::Authenticated(user) => assert_eq!(user.email, "a@x.com"),
            _ => panic!("expected authentication"),
        }
    }

    /// Wrong password and unknown email produce byte-identical rejections.
    #[tokio::test]
    async fn test_rejections_indistinguishable() {
        let gate = Gate::new(&local_gate_config(), seeded_store().await);

        let wrong_password = match gate.authenticate(&attempt("a@x.com", "wrong")).await {
            AuthOutcome::Rejected(msg) => msg,
            _ => panic!("expected rejection"),
        };
        let unknown_email = match gate.authenticate(&attempt("b@x.com", "right")).await {
            AuthOutcome::Rejected(msg) => msg,
            _ => panic!("expected rejection"),
        };

        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password, INVALID_CREDENTIALS);
    }

    /// A storage fault surfaces as Error, never as a credential rejection.
    #[tokio::test]
    async fn test_fault_is_not_a_rejection() {
        let gate = Gate::new(&local_gate_config(), Arc::new(BrokenStore));
        match gate.authenticate(&attempt("a@x.com", "right")).await {
            AuthOutcome::Error(cause) => assert!(cause.contains("store offline")),
            _ => panic!("expected a system fault"),
        }
    }

    /// Missing or empty body fields never reach a strategy.
    #[tokio::test]
    async fn test_attempt_from_body() {
        let gate = Gate::new(&local_gate_config(), seeded_store().await);

        assert!(gate
            .attempt_from_body(&json!({"email": "a@x.com", "password": "x"}))
            .is_some());
        assert!(gate.attempt_from_body(&json!({"email": "a@x.com"})).is_none());
        assert!(gate
            .attempt_from_body(&json!({"email": "", "password": "x"}))
            .is_none());
        assert!(gate.attempt_from_body(&json!({})).is_none());
    }

    /// Custom field names are honoured when configured.
    #[tokio::test]
    async fn test_configured_field_names() {
        let config = GateConfig {
            strategies: vec![StrategyConfig::Local(LocalStrategyConfig {
                name: "Local strategy".to_string(),
            })],
            email_field: "handle".to_string(),
            password_field: "secret".to_string(),
        };
        let gate = Gate::new(&config, seeded_store().await);

        let attempt = gate
            .attempt_from_body(&json!({"handle": "a@x.com", "secret": "right"}))
            .expect("fields should be picked up");
        match gate.authenticate(&attempt).await {
            AuthOutcome::Authenticated(user) => assert_eq!(user.email, "a@x.com"),
            _ => panic!("expected authentication"),
        }
    }
}
