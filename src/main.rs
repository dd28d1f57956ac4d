use anyhow::{Context, Result};
use tracing::{info, warn};

use shopmania_lib::api::{self, AppState};
use shopmania_lib::application::ProductSearchService;
use shopmania_lib::infrastructure::{ConfigLoader, init_logging_with_config, log_system_info};

/// Optional first argument: path to a config file
fn config_loader() -> ConfigLoader {
    match std::env::args_os().nth(1) {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config_loader()
        .load()
        .context("Failed to load configuration")?;

    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    log_system_info();

    let service = ProductSearchService::from_config(&config)?;
    let router = api::create_router(AppState::new(service));

    api::serve(&config.server, router, shutdown_signal()).await
}
