//! # City Repository
//!
//! Database operations for cities. Every city belongs to one of the
//! seeded states; the menu resolves the state abbreviation first with
//! [`StateRepository::id_for`](super::StateRepository::id_for).

use mowdata_core::{CityRecord, CitySort, NewCity, RowId, RowLimit};
use tracing::debug;

use crate::store::{InsertOutcome, Listing, Store};

use super::resolve_token;

const SELECT_CITIES: &str = r#"
    SELECT
        cities.id AS id,
        cities.name AS name,
        cities.zip AS zip,
        cities.state_id AS state_id,
        states.abbreviation AS state_abbreviation,
        states.name AS state_name
    FROM cities
    INNER JOIN states ON cities.state_id = states.id
"#;

/// Repository for city operations.
#[derive(Debug, Clone, Copy)]
pub struct CityRepository<'a> {
    store: &'a Store,
}

impl<'a> CityRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        CityRepository { store }
    }

    /// Inserts a city.
    ///
    /// ## Returns
    /// * `Inserted(id)` - New city id
    /// * `Declined` - Confirmation refused
    /// * `Failed(ForeignKeyViolation)` - `state_id` does not exist
    /// * `Failed(CheckViolation)` - Zip is not five digits
    pub async fn add(&self, city: &NewCity, confirm: bool) -> InsertOutcome {
        let city = city.normalized();
        debug!(name = %city.name, state_id = city.state_id, "Adding city");

        let query = sqlx::query(
            r#"
            INSERT INTO cities (name, zip, state_id)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&city.name)
        .bind(&city.zip)
        .bind(city.state_id);

        self.store
            .insert_confirmed(&city, confirm, query, "add city")
            .await
    }

    /// Lists cities joined with their state.
    ///
    /// ## Ordering
    /// - `All`: by id
    /// - `ByState`: by state id, ties by city id
    /// - `ByName`: city name ascending
    pub async fn list(&self, mode: CitySort, limit: RowLimit) -> Option<Vec<CityRecord>> {
        let order = match mode {
            CitySort::All => "ORDER BY cities.id",
            CitySort::ByState => "ORDER BY cities.state_id ASC, cities.id",
            CitySort::ByName => "ORDER BY cities.name ASC, cities.id",
        };
        let sql = format!("{} {}", SELECT_CITIES, order);

        self.store
            .fetch_rows(sqlx::query_as::<_, CityRecord>(&sql), limit, "list cities")
            .await
    }

    /// Token form of [`list`](Self::list): `all`, `state`, `name`.
    pub async fn list_by_token(&self, token: &str, raw_limit: i64) -> Option<Listing<CityRecord>> {
        let resolved = resolve_token::<CitySort>(token);
        let rows = self.list(resolved.mode, RowLimit::from_raw(raw_limit)).await?;
        Some(Listing {
            rows,
            warning: resolved.warning,
        })
    }

    pub async fn exists(&self, id: RowId) -> bool {
        let query =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS (SELECT 1 FROM cities WHERE id = ?1)").bind(id);
        self.store.fetch_exists(query, "check city").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{empty_store, sample_store};
    use crate::store::StateLookup;

    #[tokio::test]
    async fn test_add_city_in_resolved_state() {
        let store = empty_store().await;

        let state_id = match store.state_id_for("ca").await {
            StateLookup::Found(id) => id,
            other => panic!("expected CA, got {:?}", other),
        };
        let outcome = store
            .cities()
            .add(&NewCity::new("Los Angeles", "90001", state_id), false)
            .await;
        let id = outcome.id().unwrap();

        let cities = store.cities().list(CitySort::All, RowLimit::Unlimited).await.unwrap();
        assert_eq!(cities[0].id, id);
        assert_eq!(cities[0].name, "los angeles");
        assert_eq!(cities[0].state_abbreviation, "CA");
        assert_eq!(cities[0].state_name, "california");
    }

    #[tokio::test]
    async fn test_unknown_state_is_foreign_key_failure() {
        let store = empty_store().await;

        let outcome = store.cities().add(&NewCity::new("Nowhere", "00000", 999), false).await;
        match outcome {
            InsertOutcome::Failed(e) => assert!(matches!(e, DbError::ForeignKeyViolation { .. })),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(store.count("cities").await, Some(0));
    }

    #[tokio::test]
    async fn test_short_zip_is_rejected() {
        let store = empty_store().await;
        let outcome = store.cities().add(&NewCity::new("Albany", "1220", 32), false).await;
        assert!(!outcome.is_inserted());
    }

    #[tokio::test]
    async fn test_orderings() {
        let store = sample_store().await;
        store.cities().add(&NewCity::new("Albany", "12207", 32), false).await;
        store.cities().add(&NewCity::new("Boston", "02108", 21), false).await;

        let by_name = store.cities().list(CitySort::ByName, RowLimit::Unlimited).await.unwrap();
        let names: Vec<&str> = by_name.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["albany", "boston", "hicksville", "levittown"]);

        let by_state = store.cities().list(CitySort::ByState, RowLimit::Unlimited).await.unwrap();
        assert_eq!(by_state[0].state_abbreviation, "MA");
        assert!(by_state.windows(2).all(|w| w[0].state_id <= w[1].state_id));
    }

    #[tokio::test]
    async fn test_limit_and_token() {
        let store = sample_store().await;

        let listing = store.cities().list_by_token("state", 1).await.unwrap();
        assert_eq!(listing.rows.len(), 1);
        assert_eq!(listing.warning, None);

        let listing = store.cities().list_by_token("zipcode", 0).await.unwrap();
        assert!(listing.rows.is_empty());
        assert!(listing.warning.is_some());
    }

    #[tokio::test]
    async fn test_exists() {
        let store = sample_store().await;
        assert!(store.cities().exists(2).await);
        assert!(!store.cities().exists(3).await);
    }
}
