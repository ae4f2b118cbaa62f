use std::sync::Arc;

use tracing::debug;

use crate::models::UserRecord;
use crate::store::Store;

/// A bcrypt hash verified for accounts that do not exist, so an unknown
/// email costs the same as a wrong password. The hashed value is irrelevant.
const DUMMY_HASH: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// The verifier's three-way verdict. `NotFound` and `Mismatch` are internal
/// distinctions only; the gate collapses them before anything reaches a
/// caller.
pub enum Verdict {
    Match(UserRecord),
    NotFound,
    Mismatch,
}

/// Checks a submitted secret against the stored account hash.
///
/// Read-only over the user store; a storage fault surfaces as `Err`,
/// distinct from either failure verdict.
pub struct CredentialVerifier {
    store: Arc<dyn Store>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        CredentialVerifier { store }
    }

    pub async fn verify(&self, email: &str, secret: &str) -> Result<Verdict, String> {
        let user = self.store.find_user_by_email(email).await?;

        match user {
            Some(user) => {
                let matches = bcrypt::verify(secret, &user.password_hash)
                    .map_err(|e| format!("Hash verification failed: {}", e))?;
                if matches {
                    debug!("Credential match for '{}'", email);
                    Ok(Verdict::Match(user))
                } else {
                    debug!("Credential mismatch for '{}'", email);
                    Ok(Verdict::Mismatch)
                }
            }
            None => {
                // Burn the same verification effort as the mismatch path.
                let _ = bcrypt::verify(secret, DUMMY_HASH);
                debug!("No account for '{}'", email);
                Ok(Verdict::NotFound)
            }
        }
    }
}
