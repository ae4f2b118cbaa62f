use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::Store;
use crate::config::MemoryStoreConfig;
use crate::models::{Trip, UserRecord};

struct SessionEntry {
    user_id: String,
    expires_at: i64,
}

/// An in-memory store, seeded from config. Used for development and tests;
/// nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserRecord>>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    trips: RwLock<Vec<Trip>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MemoryStoreConfig) -> Self {
        let users = config
            .users
            .iter()
            .map(|seed| {
                UserRecord::new(
                    seed.email.clone(),
                    seed.name.clone(),
                    seed.password_hash.clone(),
                )
            })
            .collect();

        MemoryStore {
            users: RwLock::new(users),
            sessions: RwLock::new(HashMap::new()),
            trips: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn add_user(&self, user: &UserRecord) -> Result<(), String> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(format!("User '{}' already exists", user.email));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, String> {
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_session(
        &self,
        user: &UserRecord,
        token: &str,
        expires_at: i64,
    ) -> Result<(), String> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(
            token.to_string(),
            SessionEntry {
                user_id: user.id.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn user_for_session(&self, token: &str) -> Result<Option<UserRecord>, String> {
        let user_id = {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(token) {
                Some(entry) if entry.expires_at > Utc::now().timestamp() => {
                    Some(entry.user_id.clone())
                }
                _ => None,
            }
        };

        match user_id {
            Some(user_id) => {
                let users = self.users.read().unwrap();
                Ok(users.iter().find(|u| u.id == user_id).cloned())
            }
            None => Ok(None),
        }
    }

    async fn revoke_session(&self, token: &str) -> Result<(), String> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(token);
        Ok(())
    }

    async fn add_trip(&self, trip: &Trip) -> Result<(), String> {
        let mut trips = self.trips.write().unwrap();
        trips.push(trip.clone());
        Ok(())
    }

    async fn trips_for_user(&self, user_id: &str) -> Result<Vec<Trip>, String> {
        let trips = self.trips.read().unwrap();
        Ok(trips.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }
}
