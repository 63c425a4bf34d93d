//! # Property Repository
//!
//! Database operations for properties.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  clients ──(client_id, ON DELETE CASCADE)──► properties                │
//! │  cities  ──(city_id,   ON DELETE CASCADE)──► properties                │
//! │                                                                         │
//! │  A property cannot be inserted for a client or city that doesn't exist │
//! │  (foreign key), and it disappears with its owner or its city.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mowdata_core::{NewProperty, PropertyRecord, PropertySort, RowId, RowLimit};
use tracing::debug;

use crate::store::{InsertOutcome, Listing, Store};

use super::resolve_token;

const SELECT_PROPERTIES: &str = r#"
    SELECT
        properties.id AS id,
        properties.client_id AS client_id,
        clients.first_name AS first_name,
        clients.last_name AS last_name,
        properties.address AS address,
        properties.city_id AS city_id,
        cities.name AS city_name,
        cities.zip AS zip,
        states.abbreviation AS state_abbreviation
    FROM properties
    INNER JOIN clients ON properties.client_id = clients.id
    INNER JOIN cities ON properties.city_id = cities.id
    INNER JOIN states ON cities.state_id = states.id
"#;

/// Repository for property operations.
#[derive(Debug, Clone, Copy)]
pub struct PropertyRepository<'a> {
    store: &'a Store,
}

impl<'a> PropertyRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        PropertyRepository { store }
    }

    /// Inserts a property.
    ///
    /// An unknown `client_id` or `city_id` is rejected by the schema and
    /// comes back as `Failed(ForeignKeyViolation)`.
    pub async fn add(&self, property: &NewProperty, confirm: bool) -> InsertOutcome {
        let property = property.normalized();
        debug!(
            client_id = property.client_id,
            city_id = property.city_id,
            "Adding property"
        );

        let query = sqlx::query(
            r#"
            INSERT INTO properties (client_id, address, city_id)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(property.client_id)
        .bind(&property.address)
        .bind(property.city_id);

        self.store
            .insert_confirmed(&property, confirm, query, "add property")
            .await
    }

    /// Lists properties with owner name and location.
    ///
    /// ## Ordering
    /// - `All`: by id
    /// - `ByCity`: city id ascending
    /// - `ByClient`: owner id ascending
    pub async fn list(&self, mode: PropertySort, limit: RowLimit) -> Option<Vec<PropertyRecord>> {
        let order = match mode {
            PropertySort::All => "ORDER BY properties.id",
            PropertySort::ByCity => "ORDER BY properties.city_id ASC, properties.id",
            PropertySort::ByClient => "ORDER BY properties.client_id ASC, properties.id",
        };
        let sql = format!("{} {}", SELECT_PROPERTIES, order);

        self.store
            .fetch_rows(sqlx::query_as::<_, PropertyRecord>(&sql), limit, "list properties")
            .await
    }

    /// Token form of [`list`](Self::list): `all`, `city`, `client`.
    pub async fn list_by_token(
        &self,
        token: &str,
        raw_limit: i64,
    ) -> Option<Listing<PropertyRecord>> {
        let resolved = resolve_token::<PropertySort>(token);
        let rows = self.list(resolved.mode, RowLimit::from_raw(raw_limit)).await?;
        Some(Listing {
            rows,
            warning: resolved.warning,
        })
    }

    /// Fetches one property card, e.g. to show it before adding a service.
    ///
    /// ## Returns
    /// * `Some(record)` - Property found
    /// * `None` - No such id, or the lookup failed (logged)
    pub async fn find(&self, id: RowId) -> Option<PropertyRecord> {
        let sql = format!("{} WHERE properties.id = ?1", SELECT_PROPERTIES);
        let query = sqlx::query_as::<_, PropertyRecord>(&sql).bind(id);
        self.store.fetch_optional(query, "find property").await
    }

    pub async fn exists(&self, id: RowId) -> bool {
        let query = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (SELECT 1 FROM properties WHERE id = ?1)",
        )
        .bind(id);
        self.store.fetch_exists(query, "check property").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{empty_store, sample_store};
    use mowdata_core::NewClient;

    #[tokio::test]
    async fn test_unknown_client_is_rejected() {
        let store = sample_store().await;

        let outcome = store
            .properties()
            .add(&NewProperty::new(999_999, "1 Nowhere St", 1), false)
            .await;

        match outcome {
            InsertOutcome::Failed(e) => assert!(matches!(e, DbError::ForeignKeyViolation { .. })),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(store.count("properties").await, Some(3));
    }

    #[tokio::test]
    async fn test_add_and_find() {
        let store = sample_store().await;

        let id = store
            .properties()
            .add(&NewProperty::new(2, "12 Pear Ct", 2), false)
            .await
            .id()
            .unwrap();

        let found = store.properties().find(id).await.unwrap();
        assert_eq!(found.address, "12 pear ct");
        assert_eq!(found.first_name, "jim");
        assert_eq!(found.city_name, "levittown");
        assert_eq!(found.state_abbreviation, "NY");
        assert!(found.to_string().contains("OWNER: jim bob [OWNER ID#2]"));

        assert!(store.properties().find(id + 1).await.is_none());
    }

    #[tokio::test]
    async fn test_orderings() {
        let store = sample_store().await;

        let by_city = store.properties().list(PropertySort::ByCity, RowLimit::Unlimited).await.unwrap();
        let city_ids: Vec<RowId> = by_city.iter().map(|p| p.city_id).collect();
        assert_eq!(city_ids, vec![1, 1, 2]);

        let by_client = store
            .properties()
            .list(PropertySort::ByClient, RowLimit::Unlimited)
            .await
            .unwrap();
        assert!(by_client.windows(2).all(|w| w[0].client_id <= w[1].client_id));

        let listing = store.properties().list_by_token("owner", 2).await.unwrap();
        assert_eq!(listing.rows.len(), 2);
        assert!(listing.warning.is_some());
    }

    #[tokio::test]
    async fn test_exists_after_insert() {
        let store = empty_store().await;
        let client_id = store
            .clients()
            .add(&NewClient::new("a", "b", "1112223333", "a@b.com"), false)
            .await
            .id()
            .unwrap();
        let city_id = store
            .cities()
            .add(&mowdata_core::NewCity::new("hicksville", "11801", 32), false)
            .await
            .id()
            .unwrap();

        let id = store
            .properties()
            .add(&NewProperty::new(client_id, "57 apple ln", city_id), false)
            .await
            .id()
            .unwrap();

        assert!(store.properties().exists(id).await);
        assert!(!store.properties().exists(id + 1).await);
    }

    #[tokio::test]
    async fn test_deleting_client_cascades_to_properties() {
        let store = sample_store().await;

        assert!(store.execute("DELETE FROM clients WHERE id = 1").await);

        let remaining = store.properties().list(PropertySort::All, RowLimit::Unlimited).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].client_id, 2);
    }

    #[tokio::test]
    async fn test_deleting_city_cascades_to_properties() {
        let store = sample_store().await;

        assert!(store.execute("DELETE FROM cities WHERE id = 2").await);
        assert!(!store.properties().exists(2).await);
        assert_eq!(store.count("properties").await, Some(2));
    }
}
