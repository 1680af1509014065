//! # School Desk Bootstrap
//!
//! Brings the backend up once and reports its state: useful as a deploy
//! smoke test and to prepare a fresh data directory.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration from `SCHOOL_*` environment variables
//! 3. Provision runtime assets (receipt template)
//! 4. Connect to database & run migrations
//! 5. Health check, then report migration status

use std::process::ExitCode;

use school_backend::config::AppConfig;
use school_backend::{init_tracing, Backend};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    info!("Starting School Desk backend bootstrap");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        db_path = %config.database_path.display(),
        asset_dir = %config.asset_dir.display(),
        page_size = config.default_page_size,
        "Configuration loaded"
    );

    let backend = match Backend::start(config).await {
        Ok(backend) => backend,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match backend.db.migration_status().await {
        Ok((total, applied)) => info!(total, applied, "Migration status"),
        Err(e) => {
            error!("Could not read migration status: {}", e);
            return ExitCode::FAILURE;
        }
    }

    backend.db.close().await;
    info!("Bootstrap complete");
    ExitCode::SUCCESS
}
