mod config;
mod logging;
mod store;

pub use config::{load_config, print_schema, Config, ConfigV1, SessionConfig};
pub use logging::LoggingConfig;
pub use store::{MemoryStoreConfig, SeedUserConfig, StoreConfig};
