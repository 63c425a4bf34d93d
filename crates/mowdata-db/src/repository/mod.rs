//! # Repository Module
//!
//! Per-entity operations for the MowData store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store → Repository → SQLite                          │
//! │                                                                         │
//! │  Menu                                                                  │
//! │       │                                                                 │
//! │       │  store.services().list_by_token("date", 10)                    │
//! │       ▼                                                                 │
//! │  ServiceRepository<'_>  (borrows the Store)                            │
//! │  ├── add(&self, new_service, confirm)                                  │
//! │  ├── list(&self, mode, limit)                                          │
//! │  └── list_by_token(&self, token, raw_limit)                            │
//! │       │                                                                 │
//! │       │  SQL built here, executed by Store plumbing:                    │
//! │       │  ensure_ready → bind → stream until limit → drop cursor        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories never hold a connection of their own. They borrow the
//! [`Store`](crate::store::Store), so the readiness gate and the error
//! folding live in exactly one place.
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`] - Clients: insert, list, existence
//! - [`CityRepository`] - Cities: insert, list, existence
//! - [`PropertyRepository`] - Properties: insert, list, lookup, existence
//! - [`ServiceRepository`] - Service visits: insert, list
//! - [`StateRepository`] - Reference states: abbreviation lookup

pub mod city;
pub mod client;
pub mod property;
pub mod service;
pub mod state;

pub use city::CityRepository;
pub use client::ClientRepository;
pub use property::PropertyRepository;
pub use service::ServiceRepository;
pub use state::StateRepository;

use mowdata_core::{Resolved, SortMode};
use tracing::warn;

/// Resolves a menu token, logging the fallback when it was unrecognized.
pub(crate) fn resolve_token<M: SortMode>(token: &str) -> Resolved<M> {
    let resolved = M::resolve(token);
    if let Some(warning) = &resolved.warning {
        warn!("{}", warning);
    }
    resolved
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::pool::{Database, DbConfig};
    use crate::store::{Seed, Store};

    /// Fresh in-memory store with schema and states, no entity rows.
    pub async fn empty_store() -> Store {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let store = Store::open(db).await;
        store.bootstrap(Seed::StatesOnly).await.unwrap();
        store
    }

    /// Fresh in-memory store with the sample dataset loaded.
    pub async fn sample_store() -> Store {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let store = Store::open(db).await;
        store.bootstrap(Seed::WithSampleData).await.unwrap();
        store
    }
}
