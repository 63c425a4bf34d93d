//! # Connection Management
//!
//! Opening, probing and closing the one SQLite connection MowData uses.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Connection Lifecycle                               │
//! │                                                                         │
//! │  Connection setup (menu)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← database file, timeouts, create-if-missing      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::connect(config).await                                       │
//! │       │   Err(ConnectionFailed) → caller decides to retry or quit      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │   SqlitePool, max_connections = 1       │  exactly one live          │
//! │  │   ┌──────┐                               │  connection, owned by     │
//! │  │   │ Conn │  foreign_keys = ON            │  the Store                │
//! │  │   └──────┘                               │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  is_alive() ── false once closed, never errors                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  close().await ── idempotent                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries happen here: a failed connect is reported once and retry or
//! backoff is the caller's decision.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./mowdata.db")
///     .create_if_missing(true)
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 1 (one interactive user, one connection)
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing the connection. `None` keeps it forever,
    /// which in-memory databases need.
    pub idle_timeout: Option<Duration>,

    /// Whether a missing database file is created.
    /// Default: false (a missing database is a connection error)
    pub create_if_missing: bool,
}

impl DbConfig {
    /// Creates a new database configuration for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: None,
            create_if_missing: false,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether a missing database file is created.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::connect(DbConfig::in_memory()).await?;
    /// // Database is isolated and vanishes on close
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1, // In-memory requires single connection
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            create_if_missing: true,
        }
    }

    /// True when this config points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(self.create_if_missing)
                // WAL mode: a crash mid-insert never corrupts the file
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        // SQLite has foreign keys disabled by default for backwards
        // compatibility; every FK action in the schema depends on this.
        Ok(options.foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// The single owned connection handle.
///
/// Not `Clone`: the [`Store`](crate::store::Store) owns it for its whole
/// lifetime and closes it once at shutdown.
#[derive(Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the connection described by `config`.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Connected, foreign keys enabled
    /// * `Err(DbError::ConnectionFailed)` - Missing file, permissions, bad path
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                warn!(error = %e, "Could not open database");
                DbError::ConnectionFailed(e.to_string())
            })?;

        info!("Database connection established");
        Ok(Database { pool })
    }

    /// Reports whether the connection can still be used.
    ///
    /// Never errors: a closed handle simply answers `false`.
    pub fn is_alive(&self) -> bool {
        !self.pool.is_closed()
    }

    /// Round-trips a trivial query. Slower than [`is_alive`](Self::is_alive)
    /// but catches a connection that is open yet unusable.
    pub async fn health_check(&self) -> bool {
        if !self.is_alive() {
            return false;
        }
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection.
    ///
    /// Safe to call repeatedly; later calls only log.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            debug!("Database connection already closed");
            return;
        }
        self.pool.close().await;
        info!("Database connection closed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("mowdata-{}-{}-{}.db", tag, std::process::id(), nanos))
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();

        assert!(db.is_alive());
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();

        db.close().await;
        assert!(!db.is_alive());
        assert!(!db.health_check().await);

        // Second close is a no-op
        db.close().await;
        assert!(!db.is_alive());
    }

    #[tokio::test]
    async fn test_missing_database_is_connection_error() {
        let path = scratch_path("missing");
        let err = Database::connect(DbConfig::new(&path)).await.unwrap_err();

        assert!(matches!(err, DbError::ConnectionFailed(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_create_if_missing() {
        let path = scratch_path("create");
        let db = Database::connect(DbConfig::new(&path).create_if_missing(true))
            .await
            .unwrap();

        assert!(db.health_check().await);
        db.close().await;
        assert!(path.exists());

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/mowdata.db")
            .max_connections(0)
            .create_if_missing(true);

        assert_eq!(config.max_connections, 1);
        assert!(config.create_if_missing);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
