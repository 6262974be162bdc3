use std::process::ExitCode;

use tracing::{error, info};

use filedrop::config::DEFAULT_CONFIG_PATH;
use filedrop::{Config, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config_path =
        std::env::var("FILEDROP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = filedrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filedrop::logging::init_console_only(&config.logging.level);
    }

    info!("Filedrop v{}", env!("CARGO_PKG_VERSION"));

    let server = match WebServer::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Server failed: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
