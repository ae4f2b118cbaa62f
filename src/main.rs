use std::sync::Arc;

use passage::config::{load_config, print_schema};
use passage::startup;
use passage::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    // `--schema` prints the JSON schema for config.yaml and exits.
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
