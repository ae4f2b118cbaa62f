//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, the authentication gate and the store.

use crate::auth::Gate;
use crate::config::ConfigV1;
use crate::store::Store;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The authentication gate with its configured strategies.
    pub gate: Arc<Gate>,
    /// Store for accounts, sessions and trip resources.
    pub store: Arc<dyn Store>,
}
