//! Session endpoint handlers: login, logout and who-am-i.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthOutcome;
use crate::models::{LoginResponse, UserProfile};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/users/current", get(current_user))
}

/// Authenticates a login attempt and issues a bearer session.
///
/// The credential fields are read from the JSON body using the field names
/// configured on the gate. Bad credentials always answer with the single
/// fixed rejection message; system faults answer 500 with the cause kept
/// in the logs.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<LoginResponse>, HTTPError> {
    let attempt = state
        .gate
        .attempt_from_body(&body)
        .ok_or_else(|| HTTPError::new(StatusCode::UNAUTHORIZED, crate::auth::INVALID_CREDENTIALS))?;

    match state.gate.authenticate(&attempt).await {
        AuthOutcome::Authenticated(user) => {
            let token = Uuid::new_v4().to_string();
            let expires_at = Utc::now().timestamp() + state.config.session.ttl_seconds;

            state
                .store
                .create_session(&user, &token, expires_at)
                .await
                .map_err(|e| {
                    error!("Failed to persist session: {}", e);
                    HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
                })?;

            info!("Issued session for '{}'", user.email);
            Ok(Json(LoginResponse {
                token,
                user: user.profile(),
            }))
        }
        AuthOutcome::Rejected(message) => Err(HTTPError::new(StatusCode::UNAUTHORIZED, message)),
        AuthOutcome::Error(cause) => {
            error!("Authentication fault: {}", cause);
            Err(HTTPError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication failed",
            ))
        }
    }
}

/// Revokes the presented bearer session.
///
/// The `UserProfile` extractor has already validated the session, so the
/// header is guaranteed to carry a bearer token here.
async fn logout(
    user: UserProfile,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HTTPError> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(HTTPError::unauthorised)?;

    state.store.revoke_session(token).await.map_err(|e| {
        error!("Failed to revoke session: {}", e);
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Logout failed")
    })?;

    info!("Revoked session for '{}'", user.email);
    Ok(StatusCode::NO_CONTENT)
}

/// The who-am-i endpoint: returns the identity behind the presented token.
async fn current_user(user: UserProfile) -> Json<UserProfile> {
    Json(user)
}
