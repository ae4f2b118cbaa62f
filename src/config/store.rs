use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::mongodb_store::MongoDBConfig;

/// The available store backends, differentiated via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreConfig {
    #[serde(rename = "memory")]
    Memory(MemoryStoreConfig),

    #[serde(rename = "mongo")]
    MongoDB(MongoDBConfig),
}

/// Config for the in-memory store, optionally pre-seeded with user accounts.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Default)]
pub struct MemoryStoreConfig {
    #[serde(default)]
    pub users: Vec<SeedUserConfig>,
}

/// A single seeded account. The password is configured as a bcrypt hash,
/// never as plaintext.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct SeedUserConfig {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}
