//! # State Repository
//!
//! Lookups against the 50 reference states. States are seeded once at
//! bootstrap and are never inserted individually.

use tracing::debug;

use crate::store::{state_key, StateLookup, Store};

/// Repository for state lookups.
#[derive(Debug, Clone, Copy)]
pub struct StateRepository<'a> {
    store: &'a Store,
}

impl<'a> StateRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        StateRepository { store }
    }

    /// True if the abbreviation (any case) names a seeded state.
    pub async fn exists(&self, abbreviation: &str) -> bool {
        let key = state_key(abbreviation);
        let query = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (SELECT 1 FROM states WHERE abbreviation = ?1)",
        )
        .bind(&key);
        self.store.fetch_exists(query, "check state").await
    }

    /// Resolves an abbreviation (any case) to the state's id.
    ///
    /// ## Returns
    /// * `Found(id)` - `NY` resolves to 32 on a freshly seeded store
    /// * `NotFound` - Not one of the seeded abbreviations
    /// * `QueryFailed` - Lookup could not run (logged)
    pub async fn id_for(&self, abbreviation: &str) -> StateLookup {
        let key = state_key(abbreviation);
        debug!(abbreviation = %key, "Looking up state id");

        let query = sqlx::query_scalar::<_, i64>("SELECT id FROM states WHERE abbreviation = ?1")
            .bind(&key);
        match self.store.fetch_scalar(query, "look up state id").await {
            Ok(Some(id)) => StateLookup::Found(id),
            Ok(None) => StateLookup::NotFound,
            Err(_) => StateLookup::QueryFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::empty_store;
    use crate::store::{EntityKey, StateLookup};

    #[tokio::test]
    async fn test_id_for_is_case_insensitive() {
        let store = empty_store().await;
        assert_eq!(store.states().id_for("NY").await, StateLookup::Found(32));
        assert_eq!(store.states().id_for(" ny ").await, StateLookup::Found(32));
        assert_eq!(store.states().id_for("AL").await, StateLookup::Found(1));
        assert_eq!(store.states().id_for("ZZ").await, StateLookup::NotFound);
    }

    #[tokio::test]
    async fn test_exists_by_abbreviation() {
        let store = empty_store().await;
        assert!(store.exists(EntityKey::State("wy")).await);
        assert!(!store.exists(EntityKey::State("XX")).await);
    }

    #[tokio::test]
    async fn test_state_in_use_cannot_be_deleted() {
        let store = empty_store().await;
        assert!(store.execute("INSERT INTO cities (name, zip, state_id) VALUES ('albany', '12207', 32)").await);

        assert!(!store.execute("DELETE FROM states WHERE id = 32").await);
        assert!(store.states().exists("NY").await);

        // Unreferenced states can go
        assert!(store.execute("DELETE FROM states WHERE id = 1").await);
    }

    #[tokio::test]
    async fn test_state_id_update_cascades_to_cities() {
        let store = empty_store().await;
        assert!(store.execute("INSERT INTO cities (name, zip, state_id) VALUES ('albany', '12207', 32)").await);
        assert!(store.execute("UPDATE states SET id = 100 WHERE id = 32").await);

        let cities = store
            .cities()
            .list(mowdata_core::CitySort::All, mowdata_core::RowLimit::Unlimited)
            .await
            .unwrap();
        assert_eq!(cities[0].state_id, 100);
        assert_eq!(cities[0].state_abbreviation, "NY");
    }
}
