use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::StatusCode;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{debug, error, warn};

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// A stored user account. The secret only ever exists as a bcrypt hash;
/// this type never crosses the HTTP boundary.
#[derive(Serialize, Deserialize, Clone)]
pub struct UserRecord {
    pub id: String,
    /// Unique login handle. Resolves to at most one account.
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl UserRecord {
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            password_hash,
        }
    }

    /// The wire-safe view of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// The only user shape that is serialized into responses. Carries neither
/// the plaintext secret nor its hash.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Response body for a successful login.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Extractor implementation for protected routes: resolves the bearer token
/// from the `Authorization` header into the current user's profile.
///
/// Any request without a valid session is rejected with the fixed 401
/// signal; handlers never special-case authentication themselves.
#[axum::async_trait]
impl FromRequestParts<AppState> for UserProfile {
    type Rejection = HTTPError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<UserProfile, HTTPError> {
        // Extract the Authorization header.
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        // Retrieve the client IP (for logging purposes).
        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| {
                warn!("Unable to determine client IP address.");
                "unknown".to_string()
            });

        let token = match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.is_empty() => token,
            _ => {
                debug!("No bearer credential presented from IP='{}'", client_ip);
                return Err(HTTPError::unauthorised());
            }
        };

        match state.store.user_for_session(token).await {
            Ok(Some(user)) => {
                debug!("Resolved session for '{}' from IP='{}'", user.email, client_ip);
                Ok(user.profile())
            }
            Ok(None) => {
                debug!("Unknown or expired session from IP='{}'", client_ip);
                Err(HTTPError::unauthorised())
            }
            Err(e) => {
                // A storage fault is a system error, not a credential failure.
                error!("Session lookup failed: {}", e);
                Err(HTTPError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Session lookup failed",
                ))
            }
        }
    }
}
