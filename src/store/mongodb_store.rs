use async_trait::async_trait;
use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Trip, UserRecord};
use crate::store::Store;

/// The config struct for MongoDB connections.
/// Contains the URI and database name.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct MongoDBConfig {
    pub uri: String,
    pub database: String,
}

/// A concrete `Store` implementation that uses MongoDB.
///
/// This struct holds references to three collections:
/// - `user_collection`: account records
/// - `session_collection`: issued bearer sessions
/// - `trip_collection`: trip resources owned by accounts
pub struct MongoDBStore {
    user_collection: Collection<UserDocument>,
    session_collection: Collection<SessionDocument>,
    trip_collection: Collection<TripDocument>,
}

/// Document shape for storing users in MongoDB.
#[derive(Serialize, Deserialize, Clone)]
struct UserDocument {
    _id: ObjectId,
    user: UserRecord,
}

/// Document shape for storing sessions in MongoDB.
#[derive(Serialize, Deserialize, Clone)]
struct SessionDocument {
    _id: ObjectId,
    token: String,
    user_id: String,
    created_at: i64,
    expires_at: i64,
}

/// Document shape for storing trips in MongoDB.
#[derive(Serialize, Deserialize, Clone)]
struct TripDocument {
    _id: ObjectId,
    trip: Trip,
}

impl MongoDBStore {
    /// Creates a new `MongoDBStore` from the given config.
    /// It initializes client connections, sets up indexes, etc.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, String> {
        info!("Connecting to MongoDB at URI: {}", config.uri);

        // Parse the connection string from the config
        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| format!("Failed to parse MongoDB URI: {}", e))?;

        // Optionally set the client application name
        client_options.app_name = Some("Passage".to_string());

        // Create a new MongoDB client
        let client = Client::with_options(client_options)
            .map_err(|e| format!("Failed to create MongoDB client: {}", e))?;

        info!("MongoDB connection established successfully.");

        // Retrieve the specified database and relevant collections
        let database = client.database(&config.database);
        let user_collection = database.collection::<UserDocument>("users");
        let session_collection = database.collection::<SessionDocument>("sessions");
        let trip_collection = database.collection::<TripDocument>("trips");

        // Setup indexes for uniqueness and performance

        // 1) Unique index on user.email — one account per login handle
        let mut unique_on_email = IndexModel::default();
        unique_on_email.keys = doc! { "user.email": 1 };
        unique_on_email.options = Some(IndexOptions::builder().unique(true).build());

        user_collection
            .create_index(unique_on_email, None)
            .await
            .map_err(|e| format!("Failed to create unique index on email: {}", e))?;

        // 2) Unique index on the session token
        let mut unique_on_token = IndexModel::default();
        unique_on_token.keys = doc! { "token": 1 };
        unique_on_token.options = Some(IndexOptions::builder().unique(true).build());

        session_collection
            .create_index(unique_on_token, None)
            .await
            .map_err(|e| format!("Failed to create unique index on session token: {}", e))?;

        // 3) Index on trip.user_id for owner-scoped listings
        let mut index_on_owner = IndexModel::default();
        index_on_owner.keys = doc! { "trip.user_id": 1 };

        trip_collection
            .create_index(index_on_owner, None)
            .await
            .map_err(|e| format!("Failed to create index on trip owner: {}", e))?;

        Ok(Self {
            user_collection,
            session_collection,
            trip_collection,
        })
    }

    fn user_to_doc(user: &UserRecord) -> UserDocument {
        UserDocument {
            _id: ObjectId::new(),
            user: user.clone(),
        }
    }

    fn trip_to_doc(trip: &Trip) -> TripDocument {
        TripDocument {
            _id: ObjectId::new(),
            trip: trip.clone(),
        }
    }
}

#[async_trait]
impl Store for MongoDBStore {
    async fn add_user(&self, user: &UserRecord) -> Result<(), String> {
        self.user_collection
            .insert_one(Self::user_to_doc(user), None)
            .await
            .map_err(|e| format!("Failed to insert user: {}", e))?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, String> {
        let doc = self
            .user_collection
            .find_one(doc! { "user.email": email }, None)
            .await
            .map_err(|e| format!("Failed to query user: {}", e))?;

        Ok(doc.map(|d| d.user))
    }

    async fn create_session(
        &self,
        user: &UserRecord,
        token: &str,
        expires_at: i64,
    ) -> Result<(), String> {
        let session = SessionDocument {
            _id: ObjectId::new(),
            token: token.to_string(),
            user_id: user.id.clone(),
            created_at: Utc::now().timestamp(),
            expires_at,
        };

        self.session_collection
            .insert_one(session, None)
            .await
            .map_err(|e| format!("Failed to insert session: {}", e))?;

        Ok(())
    }

    async fn user_for_session(&self, token: &str) -> Result<Option<UserRecord>, String> {
        // Only unexpired sessions count; expired ones read as absent.
        let session = self
            .session_collection
            .find_one(
                doc! { "token": token, "expires_at": { "$gt": Utc::now().timestamp() } },
                None,
            )
            .await
            .map_err(|e| format!("Failed to query session: {}", e))?;

        if let Some(session) = session {
            let user_doc = self
                .user_collection
                .find_one(doc! { "user.id": &session.user_id }, None)
                .await
                .map_err(|e| format!("Failed to fetch user by user_id: {}", e))?;

            return Ok(user_doc.map(|d| d.user));
        }

        Ok(None)
    }

    async fn revoke_session(&self, token: &str) -> Result<(), String> {
        self.session_collection
            .delete_one(doc! { "token": token }, None)
            .await
            .map_err(|e| format!("Failed to delete session: {}", e))?;

        Ok(())
    }

    async fn add_trip(&self, trip: &Trip) -> Result<(), String> {
        self.trip_collection
            .insert_one(Self::trip_to_doc(trip), None)
            .await
            .map_err(|e| format!("Failed to insert trip: {}", e))?;
        Ok(())
    }

    async fn trips_for_user(&self, user_id: &str) -> Result<Vec<Trip>, String> {
        let mut cursor = self
            .trip_collection
            .find(doc! { "trip.user_id": user_id }, None)
            .await
            .map_err(|e| format!("Failed to list trips: {}", e))?;

        let mut trips = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| format!("Failed to read trip document: {}", e))?
        {
            trips.push(doc.trip);
        }

        Ok(trips)
    }
}
