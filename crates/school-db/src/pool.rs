//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Backend startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.class_tests() / db.sem_exams() / db.expenses() ...                 │
//! │  (each repository holds a clone of the pool handle)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode: readers don't block the writer and the
//! writer doesn't block readers.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use school_core::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::class::ClassRepository;
use crate::repository::class_test::ClassTestRepository;
use crate::repository::expense::ExpenseRepository;
use crate::repository::regularization::RegularizationRepository;
use crate::repository::school::SchoolRepository;
use crate::repository::sem_exam::SemExamRepository;

const MEMORY_PATH: &str = ":memory:";

const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Connection timeouts apply to file databases only.
fn pinned(config: &DbConfig, timeout: Duration) -> Option<Duration> {
    (!config.is_in_memory()).then_some(timeout)
}

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/school.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Page size used by list operations when the filter has no `limit`.
    /// Default: 20
    pub default_page_size: u32,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on first connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets the list page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Creates an in-memory database configuration (for tests and demos).
    ///
    /// Every in-memory pool is a separate, empty database held by a single
    /// connection, so that connection is never idled out or recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            // WAL: readers don't block the writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the last
            // transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);
        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone; every clone shares the same pool.
///
/// ## Usage in Commands
/// ```rust,ignore
/// pub async fn create_class_test(db: &Database, body: &Value) -> Result<ClassTest, ApiError> {
///     let input = CreateClassTest::parse(body)?;
///     Ok(db.class_tests().insert(input).await?)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    page_size: u32,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL, NORMAL synchronous)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or migration failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(pinned(&config, config.idle_timeout))
            .max_lifetime(pinned(&config, MAX_LIFETIME))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            page_size: config.default_page_size,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Called by `new()` when `run_migrations` is set; call it yourself
    /// otherwise.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the school repository.
    pub fn schools(&self) -> SchoolRepository {
        SchoolRepository::new(self.pool.clone()).with_page_size(self.page_size)
    }

    /// Returns the attendance regularization repository.
    pub fn regularizations(&self) -> RegularizationRepository {
        RegularizationRepository::new(self.pool.clone()).with_page_size(self.page_size)
    }

    /// Returns the class repository.
    pub fn classes(&self) -> ClassRepository {
        ClassRepository::new(self.pool.clone()).with_page_size(self.page_size)
    }

    /// Returns the class test repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let tests = db.class_tests().list(ListFilter::new(1, 20)).await?;
    /// ```
    pub fn class_tests(&self) -> ClassTestRepository {
        ClassTestRepository::new(self.pool.clone()).with_page_size(self.page_size)
    }

    /// Returns the semester exam repository.
    pub fn sem_exams(&self) -> SemExamRepository {
        SemExamRepository::new(self.pool.clone()).with_page_size(self.page_size)
    }

    /// Returns the expense repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.pool.clone()).with_page_size(self.page_size)
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations fail with
    /// `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let a = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("CREATE TABLE scratch (id INTEGER)")
            .execute(a.pool())
            .await
            .unwrap();
        assert!(sqlx::query("SELECT * FROM scratch").execute(b.pool()).await.is_err());
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/school.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(DbConfig::in_memory().default_page_size(0).default_page_size, 1);
        assert_eq!(
            DbConfig::in_memory().default_page_size(500).default_page_size,
            MAX_PAGE_SIZE
        );
    }

    #[tokio::test]
    async fn test_configured_page_size_reaches_repositories() {
        let db = Database::new(DbConfig::in_memory().default_page_size(2))
            .await
            .unwrap();
        for n in 0..3 {
            db.schools()
                .insert(school_core::contracts::school::CreateSchool {
                    name: format!("School {}", n),
                    address: "1 Main Road".into(),
                    phone: "+911234567890".into(),
                    email: "office@example.com".into(),
                    logo: None,
                })
                .await
                .unwrap();
        }

        let page = db
            .schools()
            .list(school_core::ListFilter::default())
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }
}
