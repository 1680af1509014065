//! # School Desk Backend Library
//!
//! Orchestration layer for the School Desk backend: configuration, runtime
//! assets, commands and the error type callers see.
//!
//! ## Module Organization
//! ```text
//! school_backend/
//! ├── lib.rs          ◄─── You are here (bootstrap & logging)
//! ├── config.rs       ◄─── Environment-driven configuration
//! ├── assets.rs       ◄─── Receipt template provisioning
//! ├── error.rs        ◄─── API error type for commands
//! └── commands/
//!     ├── mod.rs      ◄─── Command exports
//!     ├── school.rs   ◄─── School CRUD
//!     ├── class.rs    ◄─── Classes
//!     ├── class_test.rs / sem_exam.rs ◄─── Exams (school-checked)
//!     ├── expense.rs  ◄─── Expenses
//!     ├── regularization.rs ◄─── Attendance corrections + review
//!     └── receipt.rs  ◄─── HTML receipt generation
//! ```
//!
//! ## Command Shape
//! Every command takes the database handle plus the raw JSON it was given,
//! validates through a `school-core` contract and only then touches the
//! store:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  body: serde_json::Value                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CreateClassTest::parse(&body)  ──► ValidationErrors ──► ApiError      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.class_tests().insert(input) ──► DbError ──────────► ApiError       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(ClassTest)                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod assets;
pub mod commands;
pub mod config;
pub mod error;

use tracing::info;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use assets::ReceiptAssets;
use config::AppConfig;
use error::ApiError;
use school_db::{Database, DbConfig};

/// Everything a running backend needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Backend {
    pub config: AppConfig,
    pub db: Database,
    pub assets: ReceiptAssets,
}

impl Backend {
    /// Starts the backend from a loaded configuration.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Provision assets ─── copy receipt.html into the runtime dir        │
    /// │                          (skipped when already present)                │
    /// │                                                                         │
    /// │  2. Connect database ─── SQLite WAL, pending migrations applied        │
    /// │                                                                         │
    /// │  3. Health check ─────── SELECT 1                                       │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn start(config: AppConfig) -> Result<Self, ApiError> {
        let copied = assets::provision(&config.asset_source_dir, &config.asset_dir).await?;
        info!(copied, dir = %config.asset_dir.display(), "Assets provisioned");

        let db_config = DbConfig::new(&config.database_path)
            .max_connections(config.max_connections)
            .default_page_size(config.default_page_size);
        let db = Database::new(db_config).await?;

        if !db.health_check().await {
            return Err(ApiError::unavailable("Database is not answering queries"));
        }
        info!("Database connected and migrations applied");

        Ok(Backend {
            assets: ReceiptAssets::new(&config.asset_dir),
            config,
            db,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=school=trace` - Show trace for school crates only
/// - Default: `info,school=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,school=debug,sqlx=warn";

/// The `fmt` subscriber, gated only by `filter`.
fn log_subscriber(filter: EnvFilter) -> SubscriberBuilder<DefaultFields, Format, EnvFilter> {
    tracing_subscriber::fmt().with_env_filter(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tracing::Level;

    #[test]
    fn test_default_filter_levels() {
        let subscriber = log_subscriber(EnvFilter::new(DEFAULT_LOG_FILTER)).finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "school_db::repository", Level::DEBUG));
            assert!(!tracing::enabled!(target: "school_db::repository", Level::TRACE));
            assert!(tracing::enabled!(target: "sqlx::query", Level::WARN));
            assert!(!tracing::enabled!(target: "sqlx::query", Level::DEBUG));
            assert!(tracing::enabled!(target: "hyper", Level::INFO));
            assert!(!tracing::enabled!(target: "hyper", Level::TRACE));
        });
    }

    #[tokio::test]
    async fn test_start_provisions_and_connects() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src-assets");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("receipt.html"), "<p>{name}</p>").unwrap();

        let config = AppConfig {
            database_path: dir.path().join("school.db"),
            max_connections: 2,
            asset_source_dir: source,
            asset_dir: dir.path().join("runtime"),
            default_page_size: 5,
        };

        let backend = Backend::start(config).await.unwrap();
        assert!(backend.db.health_check().await);
        assert!(dir.path().join("runtime").join("receipt.html").exists());
        assert_eq!(backend.assets.template().await.unwrap(), "<p>{name}</p>");
    }

    #[tokio::test]
    async fn test_start_fails_without_template_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("school.db"),
            max_connections: 1,
            asset_source_dir: dir.path().join("missing"),
            asset_dir: dir.path().join("runtime"),
            default_page_size: 20,
        };

        let err = Backend::start(config).await.unwrap_err();
        assert_eq!(err.code, error::ErrorCode::ResourceUnavailable);
    }
}
