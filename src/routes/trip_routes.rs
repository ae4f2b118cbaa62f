//! Trip resource handlers.
//!
//! Trips are an external collaborator of the session core: the extractor
//! supplies the identity and these handlers only scope queries by it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::error;

use crate::models::{Trip, UserProfile};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers trip routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/trips", get(list_trips))
}

/// Lists the trips owned by the authenticated user.
async fn list_trips(
    user: UserProfile,
    State(state): State<AppState>,
) -> Result<Json<Vec<Trip>>, HTTPError> {
    let trips = state.store.trips_for_user(&user.id).await.map_err(|e| {
        error!("Failed to list trips: {}", e);
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list trips")
    })?;

    Ok(Json(trips))
}
