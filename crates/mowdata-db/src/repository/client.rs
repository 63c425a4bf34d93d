//! # Client Repository
//!
//! Database operations for clients.
//!
//! ## Key Operations
//! - Insert with optional confirmation
//! - Listing by id or by name
//! - Existence check used before a property is created

use mowdata_core::{ClientRecord, ClientSort, NewClient, RowId, RowLimit};
use tracing::debug;

use crate::store::{InsertOutcome, Listing, Store};

use super::resolve_token;

const SELECT_CLIENTS: &str = r#"
    SELECT id, first_name, last_name, phone, email
    FROM clients
"#;

/// Repository for client operations.
///
/// ## Usage
/// ```rust,ignore
/// let outcome = store
///     .clients()
///     .add(&NewClient::new("Luis", "Jaco", "123-456-7890", "luis@fake.com"), true)
///     .await;
///
/// let by_name = store.clients().list(ClientSort::ByName, RowLimit::Unlimited).await;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClientRepository<'a> {
    store: &'a Store,
}

impl<'a> ClientRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        ClientRepository { store }
    }

    /// Inserts a client.
    ///
    /// Names and email are lowercased and the phone reduced to digits
    /// before the confirm card is shown. A phone that is not ten digits
    /// after that is rejected by the schema and comes back as `Failed`.
    pub async fn add(&self, client: &NewClient, confirm: bool) -> InsertOutcome {
        let client = client.normalized();
        debug!(first_name = %client.first_name, last_name = %client.last_name, "Adding client");

        let query = sqlx::query(
            r#"
            INSERT INTO clients (first_name, last_name, phone, email)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.phone)
        .bind(&client.email);

        self.store
            .insert_confirmed(&client, confirm, query, "add client")
            .await
    }

    /// Lists clients.
    ///
    /// ## Ordering
    /// - `All`: insertion order (by id)
    /// - `ByName`: first name, then last name, ascending
    pub async fn list(&self, mode: ClientSort, limit: RowLimit) -> Option<Vec<ClientRecord>> {
        let order = match mode {
            ClientSort::All => "ORDER BY id",
            ClientSort::ByName => "ORDER BY first_name ASC, last_name ASC, id",
        };
        let sql = format!("{} {}", SELECT_CLIENTS, order);

        self.store
            .fetch_rows(sqlx::query_as::<_, ClientRecord>(&sql), limit, "list clients")
            .await
    }

    /// Lists clients using a menu token (`all`, `name`) and the menu's
    /// integer limit (`-1` = unlimited).
    pub async fn list_by_token(&self, token: &str, raw_limit: i64) -> Option<Listing<ClientRecord>> {
        let resolved = resolve_token::<ClientSort>(token);
        let rows = self.list(resolved.mode, RowLimit::from_raw(raw_limit)).await?;
        Some(Listing {
            rows,
            warning: resolved.warning,
        })
    }

    pub async fn exists(&self, id: RowId) -> bool {
        let query =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS (SELECT 1 FROM clients WHERE id = ?1)").bind(id);
        self.store.fetch_exists(query, "check client").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::test_support::{empty_store, sample_store};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn luis() -> NewClient {
        NewClient::new("Luis", "Jaco", "123-456-7890", "LuisJaco@fake.com")
    }

    #[tokio::test]
    async fn test_add_normalizes_and_returns_id() {
        let store = empty_store().await;

        let outcome = store.clients().add(&luis(), false).await;
        assert_eq!(outcome.id(), Some(1));

        let clients = store.clients().list(ClientSort::All, RowLimit::Unlimited).await.unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].first_name, "luis");
        assert_eq!(clients[0].email, "luisjaco@fake.com");
        assert_eq!(clients[0].phone, "1234567890");
        assert!(clients[0].to_string().contains("PHONE: (123) 456-7890"));
    }

    #[tokio::test]
    async fn test_bad_phone_is_rejected_by_schema() {
        let store = empty_store().await;

        let outcome = store
            .clients()
            .add(&NewClient::new("a", "b", "123-456", "a@b.com"), false)
            .await;

        match outcome {
            InsertOutcome::Failed(e) => assert!(matches!(e, DbError::CheckViolation { .. })),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(store.count("clients").await, Some(0));
    }

    #[tokio::test]
    async fn test_declined_confirmation_writes_nothing() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let shown = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&shown);
        let store = Store::open(db).await.with_confirmer(move |card: &str| {
            assert!(card.contains("[CLIENT 'luis jaco']"));
            seen.fetch_add(1, Ordering::SeqCst);
            false
        });
        store.bootstrap(crate::store::Seed::StatesOnly).await.unwrap();

        let outcome = store.clients().add(&luis(), true).await;
        assert!(matches!(outcome, InsertOutcome::Declined));
        assert_eq!(shown.load(Ordering::SeqCst), 1);
        assert_eq!(store.count("clients").await, Some(0));
    }

    #[tokio::test]
    async fn test_confirm_without_hook_is_declined() {
        let store = empty_store().await;
        let outcome = store.clients().add(&luis(), true).await;
        assert!(matches!(outcome, InsertOutcome::Declined));
        assert_eq!(store.count("clients").await, Some(0));
    }

    #[tokio::test]
    async fn test_by_name_is_ordered() {
        let store = sample_store().await;
        store
            .clients()
            .add(&NewClient::new("Anna", "Zed", "5555555555", "anna@zed.com"), false)
            .await;
        store
            .clients()
            .add(&NewClient::new("Anna", "Able", "5555555556", "anna@able.com"), false)
            .await;

        let clients = store.clients().list(ClientSort::ByName, RowLimit::Unlimited).await.unwrap();
        let names: Vec<(String, String)> = clients
            .iter()
            .map(|c| (c.first_name.clone(), c.last_name.clone()))
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names[0], ("anna".to_string(), "able".to_string()));
    }

    #[tokio::test]
    async fn test_list_by_token_falls_back() {
        let store = sample_store().await;

        let listing = store.clients().list_by_token("shoe size", -1).await.unwrap();
        assert_eq!(listing.rows.len(), 2);
        assert!(listing.warning.unwrap().contains("shoe size"));

        let listing = store.clients().list_by_token("NAME", 1).await.unwrap();
        assert_eq!(listing.rows.len(), 1);
        assert_eq!(listing.warning, None);
        assert_eq!(listing.rows[0].first_name, "jim");
    }

    #[tokio::test]
    async fn test_exists() {
        let store = sample_store().await;
        assert!(store.clients().exists(1).await);
        assert!(store.clients().exists(2).await);
        assert!(!store.clients().exists(3).await);
    }
}
