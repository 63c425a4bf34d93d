//! # mowdata-db: Data Store for MowData
//!
//! This crate owns the SQLite database behind MowData: opening the
//! connection, creating and seeding the schema, and the typed inserts and
//! listings the interactive menu calls.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MowData Data Flow                                │
//! │                                                                         │
//! │  Menu ("list services by date, 10 rows")                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   mowdata-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │     Store     │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │◄───│  (store.rs)   │───►│ (schema.rs)  │  │   │
//! │  │   │               │    │ gate + plumb  │    │ 5 tables     │  │   │
//! │  │   │ one SQLite    │    └───────▲───────┘    │ 50 states    │  │   │
//! │  │   │ connection    │            │            │ sample data  │  │   │
//! │  │   └───────────────┘    ┌───────┴───────┐    └──────────────┘  │   │
//! │  │                        │ Repositories  │                      │   │
//! │  │                        │ client, city, │                      │   │
//! │  │                        │ property,     │                      │   │
//! │  │                        │ service, state│                      │   │
//! │  │                        └───────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./mowdata.db (or :memory: in tests)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection configuration and lifecycle
//! - [`schema`] - Table definitions, existence probe, seeding
//! - [`store`] - The `Store`, its outcome types and shared plumbing
//! - [`repository`] - Per-entity inserts and listings
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mowdata_db::{Database, DbConfig, Seed, Store};
//! use mowdata_core::{ClientSort, NewClient, RowLimit};
//!
//! let db = Database::connect(DbConfig::new("mowdata.db").create_if_missing(true)).await?;
//! let store = Store::open(db).await;
//! store.bootstrap(Seed::StatesOnly).await?;
//!
//! store.clients().add(&NewClient::new("Luis", "Jaco", "1234567890", "l@j.com"), false).await;
//! let clients = store.clients().list(ClientSort::ByName, RowLimit::Unlimited).await;
//!
//! store.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{
    Bootstrap, Confirm, EntityKey, InsertOutcome, Listing, Seed, StateLookup, Store,
};

// Repository re-exports for convenience
pub use repository::{
    CityRepository, ClientRepository, PropertyRepository, ServiceRepository, StateRepository,
};
