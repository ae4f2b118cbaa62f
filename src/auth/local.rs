use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::gate::{AuthOutcome, CredentialAttempt, Strategy, INVALID_CREDENTIALS};
use super::verifier::{CredentialVerifier, Verdict};

/// Config for the local email+password strategy.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct LocalStrategyConfig {
    /// A friendly name for logs.
    pub name: String,
}

/// The local strategy: verifies the attempt against the user store through
/// the credential verifier. Whether the account was missing or the secret
/// wrong is collapsed here; nothing past this boundary can tell them apart.
pub struct LocalStrategy {
    config: LocalStrategyConfig,
    verifier: CredentialVerifier,
}

impl LocalStrategy {
    pub fn new(config: &LocalStrategyConfig, verifier: CredentialVerifier) -> Self {
        Self {
            config: config.clone(),
            verifier,
        }
    }
}

#[async_trait::async_trait]
impl Strategy for LocalStrategy {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn verify(&self, attempt: &CredentialAttempt) -> AuthOutcome {
        match self.verifier.verify(&attempt.email, &attempt.secret).await {
            Ok(Verdict::Match(user)) => AuthOutcome::Authenticated(user),
            Ok(Verdict::NotFound) | Ok(Verdict::Mismatch) => {
                AuthOutcome::Rejected(INVALID_CREDENTIALS.to_string())
            }
            Err(cause) => AuthOutcome::Error(cause),
        }
    }
}
