use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::{memory_store::MemoryStore, mongodb_store::MongoDBStore};
use crate::config::StoreConfig;
use crate::models::{Trip, UserRecord};

/// The Store trait abstracts persistence for accounts, sessions and the
/// trip resources that hang off an authenticated user.
///
/// Sessions map an opaque bearer token to an account, with an absolute
/// expiry. `user_for_session` must treat an expired session as absent.
#[async_trait]
pub trait Store: Send + Sync {
    async fn add_user(&self, user: &UserRecord) -> Result<(), String>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, String>;

    async fn create_session(
        &self,
        user: &UserRecord,
        token: &str,
        expires_at: i64,
    ) -> Result<(), String>;
    async fn user_for_session(&self, token: &str) -> Result<Option<UserRecord>, String>;
    async fn revoke_session(&self, token: &str) -> Result<(), String>;

    async fn add_trip(&self, trip: &Trip) -> Result<(), String>;
    async fn trips_for_user(&self, user_id: &str) -> Result<Vec<Trip>, String>;
}

/// Creates a concrete store implementation based on the StoreConfig.
pub async fn create_store(config: &StoreConfig) -> Arc<dyn Store> {
    match config {
        StoreConfig::Memory(memory_config) => {
            info!("Using in-memory store.");
            Arc::new(MemoryStore::from_config(memory_config))
        }
        StoreConfig::MongoDB(mongo_config) => match MongoDBStore::new(mongo_config).await {
            Ok(store) => {
                info!("Successfully created MongoDB store.");
                Arc::new(store)
            }
            Err(e) => {
                error!("Failed to create MongoDB store: {}", e);
                std::process::exit(1);
            }
        },
    }
}
