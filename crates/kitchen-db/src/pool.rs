//! # Database Pool Management
//!
//! Connection pool creation and configuration for the kitchen ledger.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) / in_memory() / from_env_or(default)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await    ← create pool + run migrations         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.ingredients() / db.products() / db.inventory() / db.movements()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## SQLite Settings
//! - WAL journal for file ledgers: readers never block the deduction writer
//! - Busy timeout: concurrent deductions queue on the write lock instead of
//!   failing straight away with `SQLITE_BUSY`
//! - NORMAL synchronous
//! - Foreign keys on (association rows cascade with their product)
//! - `KITCHEN_DB_PATH` overrides the file path via `DbConfig::from_env_or`

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::migrations;
use crate::repository::ingredient::IngredientRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::movement::MovementRepository;
use crate::repository::product::ProductRepository;

/// Overrides the database file chosen by the caller.
pub const DB_PATH_ENV: &str = "KITCHEN_DB_PATH";

// =============================================================================
// Configuration
// =============================================================================

/// Where the ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to the pool's single connection; gone when it closes.
    Memory,
}

/// Ledger database settings.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/kitchen/ledger.db")
///     .max_connections(4)
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Pool ceiling. Default: 5
    pub max_connections: u32,

    /// Connections kept open while idle. Default: 1
    pub min_connections: u32,

    /// How long to wait for a free pooled connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// How long a statement waits on SQLite's write lock before failing
    /// with `SQLITE_BUSY`. Default: 5 seconds
    pub busy_timeout: Duration,

    /// Apply embedded migrations on connect. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Ledger stored in the file at `path`, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// `KITCHEN_DB_PATH` if set, `default_path` otherwise.
    pub fn from_env_or(default_path: impl Into<PathBuf>) -> Self {
        match std::env::var_os(DB_PATH_ENV) {
            Some(path) => Self::new(path),
            None => Self::new(default_path),
        }
    }

    /// Throwaway in-memory ledger (tests, demos).
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// File path, if this is a file-backed ledger.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            // WAL is not available for in-memory databases
            DbLocation::Memory => SqliteConnectOptions::new()
                .in_memory(true)
                .journal_mode(SqliteJournalMode::Memory),
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout);

        match self.location {
            // Recycling the only connection would drop the whole ledger.
            DbLocation::Memory => options
                .idle_timeout(Option::<Duration>::None)
                .max_lifetime(Option::<Duration>::None),
            DbLocation::File(_) => options.idle_timeout(Some(Duration::from_secs(600))),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the kitchen ledger. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, if configured, migrates the schema.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        match config.path() {
            Some(path) => info!(path = %path.display(), "Opening kitchen ledger"),
            None => info!("Opening in-memory kitchen ledger"),
        }

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await?;

        debug!(
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "Ledger pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn ingredients(&self) -> IngredientRepository {
        IngredientRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Inventory mirror records.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    /// Append-only movement log.
    pub fn movements(&self) -> MovementRepository {
        MovementRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing kitchen database pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);

        let status = migrations::schema_status(db.pool()).await.unwrap();
        assert!(status.is_current());
        assert!(status.embedded >= 1);

        // second run is a no-op
        db.run_migrations().await.unwrap();
        assert_eq!(migrations::schema_status(db.pool()).await.unwrap(), status);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/kitchen.db")
            .max_connections(10)
            .busy_timeout(Duration::from_secs(1))
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert_eq!(config.path(), Some(Path::new("/tmp/kitchen.db")));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_in_memory_has_no_path() {
        let config = DbConfig::in_memory();
        assert_eq!(config.location, DbLocation::Memory);
        assert!(config.path().is_none());
        assert_eq!(config.max_connections, 1);
    }

    #[tokio::test]
    async fn test_file_ledger_survives_reopen() {
        let path = std::env::temp_dir().join(format!("kitchen-{}.db", uuid::Uuid::new_v4()));

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.ingredients()
            .insert(&kitchen_core::Ingredient::new("Cheese", "g", 10.0, 2.0))
            .await
            .unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.ingredients().count().await.unwrap(), 1);
        reopened.close().await;

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }
}
