//! # Data Store
//!
//! The single entry point the menu talks to. Owns the connection, gates
//! every entity operation on a bootstrapped schema, and gives each
//! operation the same failure behavior: log once, return a sentinel.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   One Insert, Start To Finish                           │
//! │                                                                         │
//! │  store.clients().add(&new_client, confirm = true)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Normalize ── lowercase names/email, digits-only phone              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Confirm   ── card handed to the Confirm hook                       │
//! │       │            declined? ──► InsertOutcome::Declined (no-op)       │
//! │       ▼                                                                 │
//! │  3. Persist   ── ensure_ready() (alive + schema present)               │
//! │       │          bound-parameter INSERT                                │
//! │       │                                                                 │
//! │       ├── Ok, 1 row   ──► InsertOutcome::Inserted(id)                  │
//! │       └── Err         ──► warn!, InsertOutcome::Failed(DbError)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here returns a raw `sqlx::Error` to the caller. Lists and
//! lookups resolve to `Option`, existence checks to `bool` (fail-closed),
//! inserts to [`InsertOutcome`].

use futures::TryStreamExt;
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use mowdata_core::validation::normalize_abbreviation;
use mowdata_core::{RowId, RowLimit};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::city::CityRepository;
use crate::repository::client::ClientRepository;
use crate::repository::property::PropertyRepository;
use crate::repository::service::ServiceRepository;
use crate::repository::state::StateRepository;
use crate::schema;

// =============================================================================
// Outcome Types
// =============================================================================

/// Asks the user to approve a normalized record before it is written.
///
/// The menu implements this by printing the card and reading a yes/no.
/// Any `Fn(&str) -> bool` closure works too.
pub trait Confirm: Send + Sync {
    fn confirm(&self, card: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, card: &str) -> bool {
        self(card)
    }
}

/// Result of an insert operation.
#[derive(Debug)]
pub enum InsertOutcome {
    /// Row written; carries its new id.
    Inserted(RowId),
    /// The user declined at the confirm step. Not an error.
    Declined,
    /// Not written. Constraint rejections land here as well as
    /// connection or schema problems.
    Failed(DbError),
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }

    /// The new row id, if one was written.
    pub fn id(&self) -> Option<RowId> {
        match self {
            InsertOutcome::Inserted(id) => Some(*id),
            _ => None,
        }
    }
}

/// Result of resolving a state abbreviation to its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateLookup {
    Found(RowId),
    NotFound,
    /// The lookup itself could not run (closed connection, missing schema).
    QueryFailed,
}

impl StateLookup {
    pub fn id(&self) -> Option<RowId> {
        match self {
            StateLookup::Found(id) => Some(*id),
            _ => None,
        }
    }
}

/// The key an existence check is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKey<'a> {
    Client(RowId),
    City(RowId),
    Property(RowId),
    /// Two-letter abbreviation, any case.
    State(&'a str),
}

/// Rows from a token-driven list call, plus the fallback warning if the
/// token was not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub rows: Vec<T>,
    pub warning: Option<String>,
}

/// How much seed data [`Store::bootstrap`] loads into a fresh schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    /// Only the 50 reference states.
    #[default]
    StatesOnly,
    /// States plus the sample clients, cities, properties and services.
    WithSampleData,
}

/// What [`Store::bootstrap`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// All five tables already existed; nothing was created or seeded.
    AlreadyPresent,
    /// Tables were created and seeded.
    Created { sample_data: bool },
}

// =============================================================================
// Store
// =============================================================================

/// The data store: one owned connection plus the schema gate.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::connect(DbConfig::new("mowdata.db")).await?;
/// let store = Store::open(db).await;
/// store.bootstrap(Seed::StatesOnly).await?;
///
/// let outcome = store.clients().add(&new_client, false).await;
/// let clients = store.clients().list(ClientSort::ByName, RowLimit::Unlimited).await;
///
/// store.close().await;
/// ```
pub struct Store {
    db: Database,
    schema_ready: AtomicBool,
    confirmer: Option<Box<dyn Confirm>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("db", &self.db)
            .field("schema_ready", &self.schema_ready.load(Ordering::Relaxed))
            .field("confirmer", &self.confirmer.is_some())
            .finish()
    }
}

impl Store {
    /// Wraps a connection without probing it. Entity operations are
    /// refused until [`tables_present`](Self::tables_present) or
    /// [`bootstrap`](Self::bootstrap) has seen the full schema.
    pub fn new(db: Database) -> Self {
        Store {
            db,
            schema_ready: AtomicBool::new(false),
            confirmer: None,
        }
    }

    /// Wraps a connection and probes the schema once.
    pub async fn open(db: Database) -> Self {
        let store = Store::new(db);
        store.tables_present().await;
        store
    }

    /// Installs the hook used when an insert is called with `confirm = true`.
    pub fn with_confirmer(mut self, confirmer: impl Confirm + 'static) -> Self {
        self.confirmer = Some(Box::new(confirmer));
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn is_alive(&self) -> bool {
        self.db.is_alive()
    }

    /// True once the five tables are known to exist.
    pub fn is_ready(&self) -> bool {
        self.schema_ready.load(Ordering::Relaxed)
    }

    /// Closes the owned connection. Safe to call more than once.
    pub async fn close(&self) {
        self.db.close().await;
    }

    // -------------------------------------------------------------------------
    // Repositories
    // -------------------------------------------------------------------------

    pub fn clients(&self) -> ClientRepository<'_> {
        ClientRepository::new(self)
    }

    pub fn cities(&self) -> CityRepository<'_> {
        CityRepository::new(self)
    }

    pub fn properties(&self) -> PropertyRepository<'_> {
        PropertyRepository::new(self)
    }

    pub fn services(&self) -> ServiceRepository<'_> {
        ServiceRepository::new(self)
    }

    pub fn states(&self) -> StateRepository<'_> {
        StateRepository::new(self)
    }

    // -------------------------------------------------------------------------
    // Schema Bootstrap
    // -------------------------------------------------------------------------

    /// Probes the catalog for all five tables and records the answer.
    ///
    /// Returns false on a closed connection or a failed probe.
    pub async fn tables_present(&self) -> bool {
        if !self.is_alive() {
            warn!("Cannot verify tables: connection is closed");
            self.schema_ready.store(false, Ordering::Relaxed);
            return false;
        }

        let present = match schema::tables_present(self.db.pool()).await {
            Ok(present) => present,
            Err(e) => {
                warn!(error = %e, "Error occurred while verifying table existence");
                false
            }
        };
        self.schema_ready.store(present, Ordering::Relaxed);
        present
    }

    /// Creates the five tables unless they already exist.
    pub async fn create_schema(&self) -> DbResult<()> {
        self.ensure_alive()?;
        if self.tables_present().await {
            debug!("Tables already present, skipping creation");
            return Ok(());
        }

        schema::create_schema(self.db.pool()).await?;
        self.schema_ready.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Seeds the 50 reference states into an empty `states` table.
    pub async fn seed_states(&self) -> DbResult<()> {
        self.ensure_ready()?;
        schema::seed_states(self.db.pool()).await
    }

    /// Loads the sample dataset (needs seeded states).
    pub async fn seed_sample_data(&self) -> DbResult<()> {
        self.ensure_ready()?;
        schema::seed_sample_data(self.db.pool()).await
    }

    /// Probe, and on a fresh database create and seed.
    ///
    /// Seeding only ever follows creation, so running this against an
    /// existing schema never duplicates states.
    pub async fn bootstrap(&self, seed: Seed) -> DbResult<Bootstrap> {
        self.ensure_alive()?;
        if self.tables_present().await {
            info!("MowData tables present, bootstrap not needed");
            return Ok(Bootstrap::AlreadyPresent);
        }

        self.create_schema().await?;
        self.seed_states().await?;

        let sample_data = seed == Seed::WithSampleData;
        if sample_data {
            self.seed_sample_data().await?;
        }

        Ok(Bootstrap::Created { sample_data })
    }

    // -------------------------------------------------------------------------
    // Existence Checks
    // -------------------------------------------------------------------------

    /// Single-query existence check. Fail-closed: any failure reads as absent.
    pub async fn exists(&self, key: EntityKey<'_>) -> bool {
        match key {
            EntityKey::Client(id) => self.clients().exists(id).await,
            EntityKey::City(id) => self.cities().exists(id).await,
            EntityKey::Property(id) => self.properties().exists(id).await,
            EntityKey::State(abbreviation) => self.states().exists(abbreviation).await,
        }
    }

    /// Resolves a state abbreviation (any case) to its id.
    pub async fn state_id_for(&self, abbreviation: &str) -> StateLookup {
        self.states().id_for(abbreviation).await
    }

    /// Row count for one of the five tables, `None` on failure.
    pub async fn count(&self, table: &str) -> Option<i64> {
        if let Err(e) = self.ensure_ready() {
            warn!(error = %e, table, "Cannot count rows");
            return None;
        }
        match schema::count_rows(self.db.pool(), table).await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, table, "Error occurred while counting rows");
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Raw Execution Primitives
    // -------------------------------------------------------------------------

    /// Runs a read statement and returns every row.
    ///
    /// `None` if the connection is closed or the statement fails; the reason
    /// is logged, never returned.
    pub async fn query(&self, sql: &str) -> Option<Vec<SqliteRow>> {
        if let Err(e) = self.ensure_alive() {
            warn!(error = %e, "Query not attempted");
            return None;
        }
        debug!(sql, "Running query");
        match sqlx::query(sql).fetch_all(self.db.pool()).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(error = %DbError::from(e), "Error occurred while running query");
                None
            }
        }
    }

    /// Runs a write statement; true only if at least one row was affected.
    pub async fn execute(&self, sql: &str) -> bool {
        if let Err(e) = self.ensure_alive() {
            warn!(error = %e, "Statement not attempted");
            return false;
        }
        debug!(sql, "Executing statement");
        match sqlx::query(sql).execute(self.db.pool()).await {
            Ok(result) => result.rows_affected() >= 1,
            Err(e) => {
                warn!(error = %DbError::from(e), "Error occurred while executing statement");
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Shared Plumbing (used by the repositories)
    // -------------------------------------------------------------------------

    fn ensure_alive(&self) -> DbResult<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(DbError::ConnectionFailed("Connection is closed".to_string()))
        }
    }

    /// Precondition for every entity operation.
    pub(crate) fn ensure_ready(&self) -> DbResult<()> {
        self.ensure_alive()?;
        if self.is_ready() {
            Ok(())
        } else {
            Err(DbError::SchemaMissing)
        }
    }

    /// Reads at most `limit` rows from the cursor, then drops it.
    ///
    /// The stream is released on every path out of this function,
    /// including the early return on a mid-iteration error.
    pub(crate) async fn fetch_rows<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        limit: RowLimit,
        what: &str,
    ) -> Option<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        if let Err(e) = self.ensure_ready() {
            warn!(error = %e, "Cannot {}", what);
            return None;
        }

        let mut cursor = query.fetch(self.db.pool());
        let mut rows = Vec::new();
        while !limit.is_reached(rows.len()) {
            match cursor.try_next().await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %DbError::from(e), "Error occurred while attempting to {}", what);
                    return None;
                }
            }
        }
        drop(cursor);

        debug!(count = rows.len(), ?limit, "Completed {}", what);
        Some(rows)
    }

    /// Fetches zero or one row; failures are logged and read as `None`.
    pub(crate) async fn fetch_optional<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        what: &str,
    ) -> Option<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        if let Err(e) = self.ensure_ready() {
            warn!(error = %e, "Cannot {}", what);
            return None;
        }
        match query.fetch_optional(self.db.pool()).await {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %DbError::from(e), "Error occurred while attempting to {}", what);
                None
            }
        }
    }

    /// Runs a `SELECT EXISTS (...)` query. Fail-closed.
    pub(crate) async fn fetch_exists<'q>(
        &self,
        query: QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>,
        what: &str,
    ) -> bool {
        if let Err(e) = self.ensure_ready() {
            warn!(error = %e, "Cannot {}", what);
            return false;
        }
        match query.fetch_one(self.db.pool()).await {
            Ok(flag) => flag != 0,
            Err(e) => {
                warn!(error = %DbError::from(e), "Error occurred while attempting to {}", what);
                false
            }
        }
    }

    /// Fetches a single scalar, distinguishing "no row" from "failed".
    pub(crate) async fn fetch_scalar<'q>(
        &self,
        query: QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>,
        what: &str,
    ) -> DbResult<Option<i64>> {
        self.ensure_ready()?;
        query.fetch_optional(self.db.pool()).await.map_err(|e| {
            let e = DbError::from(e);
            warn!(error = %e, "Error occurred while attempting to {}", what);
            e
        })
    }

    /// Steps two and three of every insert: confirm, then persist.
    ///
    /// `card` is the already-normalized record.
    pub(crate) async fn insert_confirmed<'q>(
        &self,
        card: &dyn fmt::Display,
        confirm: bool,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        what: &str,
    ) -> InsertOutcome {
        if confirm && !self.confirmed(card) {
            info!("{} declined at confirmation", what);
            return InsertOutcome::Declined;
        }

        if let Err(e) = self.ensure_ready() {
            warn!(error = %e, "Cannot {}", what);
            return InsertOutcome::Failed(e);
        }

        match query.execute(self.db.pool()).await {
            Ok(result) if result.rows_affected() >= 1 => {
                let id = result.last_insert_rowid();
                info!(id, "Successful {}", what);
                InsertOutcome::Inserted(id)
            }
            Ok(_) => {
                warn!("{} affected no rows", what);
                InsertOutcome::Failed(DbError::QueryFailed(format!("{} affected no rows", what)))
            }
            Err(e) => {
                let e = DbError::from(e);
                warn!(error = %e, "Error occurred while attempting to {}", what);
                InsertOutcome::Failed(e)
            }
        }
    }

    fn confirmed(&self, card: &dyn fmt::Display) -> bool {
        match &self.confirmer {
            Some(confirmer) => confirmer.confirm(&card.to_string()),
            None => {
                warn!("Confirmation requested but no confirm hook is installed");
                false
            }
        }
    }
}

/// Uppercases an abbreviation for lookup.
pub(crate) fn state_key(abbreviation: &str) -> String {
    normalize_abbreviation(abbreviation)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use sqlx::Row;

    async fn fresh_store() -> Store {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        Store::open(db).await
    }

    #[tokio::test]
    async fn test_open_on_empty_database_is_not_ready() {
        let store = fresh_store().await;
        assert!(store.is_alive());
        assert!(!store.is_ready());
        assert!(!store.tables_present().await);
    }

    #[tokio::test]
    async fn test_bootstrap_creates_then_skips() {
        let store = fresh_store().await;

        let first = store.bootstrap(Seed::StatesOnly).await.unwrap();
        assert_eq!(first, Bootstrap::Created { sample_data: false });
        assert!(store.is_ready());
        assert!(store.tables_present().await);
        assert_eq!(store.count("states").await, Some(50));

        // Second run sees the tables and seeds nothing
        let second = store.bootstrap(Seed::WithSampleData).await.unwrap();
        assert_eq!(second, Bootstrap::AlreadyPresent);
        assert_eq!(store.count("states").await, Some(50));
        assert_eq!(store.count("clients").await, Some(0));
    }

    #[tokio::test]
    async fn test_create_schema_is_gated_on_probe() {
        let store = fresh_store().await;
        store.create_schema().await.unwrap();
        store.create_schema().await.unwrap();
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_seed_states_twice_is_refused() {
        let store = fresh_store().await;
        store.create_schema().await.unwrap();
        store.seed_states().await.unwrap();

        let err = store.seed_states().await.unwrap_err();
        assert!(matches!(err, DbError::AlreadySeeded(50)));
        assert_eq!(store.count("states").await, Some(50));
    }

    #[tokio::test]
    async fn test_operations_refused_before_bootstrap() {
        let store = fresh_store().await;

        assert!(!store.exists(EntityKey::Client(1)).await);
        assert_eq!(store.state_id_for("NY").await, StateLookup::QueryFailed);
        assert_eq!(store.count("clients").await, None);
        assert!(matches!(store.seed_states().await, Err(DbError::SchemaMissing)));
    }

    #[tokio::test]
    async fn test_raw_query_and_execute() {
        let store = fresh_store().await;
        store.bootstrap(Seed::StatesOnly).await.unwrap();

        let rows = store
            .query("SELECT abbreviation FROM states ORDER BY id LIMIT 2")
            .await
            .unwrap();
        let first: String = rows[0].get("abbreviation");
        assert_eq!(rows.len(), 2);
        assert_eq!(first, "AL");

        assert!(store.query("SELECT * FROM no_such_table").await.is_none());

        // Nothing matches, so nothing is affected
        assert!(!store.execute("DELETE FROM clients WHERE id = 1").await);
        assert!(store.execute("UPDATE states SET name = 'new york' WHERE abbreviation = 'NY'").await);
    }

    #[tokio::test]
    async fn test_closed_connection_returns_sentinels() {
        let store = fresh_store().await;
        store.bootstrap(Seed::StatesOnly).await.unwrap();
        store.close().await;
        store.close().await;

        assert!(!store.is_alive());
        assert!(store.query("SELECT 1").await.is_none());
        assert!(!store.execute("DELETE FROM states").await);
        assert!(!store.tables_present().await);
        assert!(!store.exists(EntityKey::State("NY")).await);
        assert!(matches!(
            store.bootstrap(Seed::StatesOnly).await,
            Err(DbError::ConnectionFailed(_))
        ));
    }
}
