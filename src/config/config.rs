use figment::providers::{Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::auth::GateConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0, containing the store, the authentication gate,
/// session settings and the server bind address.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub store: StoreConfig,
    pub gate: GateConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub bind_address: String,
    pub logging: LoggingConfig,
}

/// Session token lifetime settings.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct SessionConfig {
    /// Seconds until an issued session expires.
    pub ttl_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        // 30 days, matching the original deployment.
        SessionConfig {
            ttl_seconds: 30 * 24 * 3600,
        }
    }
}

/// Load config from a YAML file named "config.yaml" in the current directory.
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new().merge(Yaml::file("./config.yaml"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
