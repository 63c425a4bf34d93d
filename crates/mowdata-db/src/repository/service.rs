//! # Service Repository
//!
//! Database operations for service visits.
//!
//! A service outlives its property: deleting the property sets
//! `services.property_id` to NULL, so listings use LEFT JOINs and the
//! location fields of [`ServiceRecord`] are optional.
//!
//! `service_cost` is `NUMERIC(5, 2)`. SQLite keeps whole amounts as
//! integers and the rest as reals, so listings read it back as
//! `round(service_cost * 100)` cents.

use mowdata_core::{NewService, RowLimit, ServiceRecord, ServiceSort};
use tracing::debug;

use crate::store::{InsertOutcome, Listing, Store};

use super::resolve_token;

const SELECT_SERVICES: &str = r#"
    SELECT
        services.id AS id,
        services.property_id AS property_id,
        properties.address AS address,
        cities.name AS city_name,
        cities.zip AS zip,
        states.abbreviation AS state_abbreviation,
        services.service_date AS service_date,
        CAST(ROUND(services.service_cost * 100) AS INTEGER) AS cost,
        services.mow AS mow,
        services.leaf_blow AS leaf_blow,
        services.seed AS seed,
        services.fertilizer AS fertilizer,
        services.mulch AS mulch,
        services.remove_tree AS remove_tree,
        services.trim_tree AS trim_tree,
        services.power_wash AS power_wash,
        services.snow_plow AS snow_plow,
        services.notes AS notes
    FROM services
    LEFT JOIN properties ON services.property_id = properties.id
    LEFT JOIN cities ON properties.city_id = cities.id
    LEFT JOIN states ON cities.state_id = states.id
"#;

/// Repository for service visit operations.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRepository<'a> {
    store: &'a Store,
}

impl<'a> ServiceRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        ServiceRepository { store }
    }

    /// Inserts a service visit.
    ///
    /// Cost is stored as a two-decimal `NUMERIC`; blank notes are stored as NULL.
    pub async fn add(&self, service: &NewService, confirm: bool) -> InsertOutcome {
        let service = service.normalized();
        debug!(
            property_id = service.property_id,
            date = %service.date,
            cost = %service.cost,
            "Adding service"
        );

        let tasks = service.tasks;
        let query = sqlx::query(
            r#"
            INSERT INTO services (
                property_id, service_date, service_cost,
                mow, leaf_blow, seed,
                fertilizer, mulch, remove_tree,
                trim_tree, power_wash, snow_plow,
                notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(service.property_id)
        .bind(service.date)
        .bind(service.cost.to_numeric())
        .bind(tasks.mow)
        .bind(tasks.leaf_blow)
        .bind(tasks.seed)
        .bind(tasks.fertilizer)
        .bind(tasks.mulch)
        .bind(tasks.remove_tree)
        .bind(tasks.trim_tree)
        .bind(tasks.power_wash)
        .bind(tasks.snow_plow)
        .bind(service.notes.as_deref());

        self.store
            .insert_confirmed(&service, confirm, query, "add service")
            .await
    }

    /// Lists service visits with their location.
    ///
    /// ## Ordering
    /// - `All`: by id
    /// - `ByProperty`: property id ascending (removed properties first)
    /// - `ByDate`: most recent first
    pub async fn list(&self, mode: ServiceSort, limit: RowLimit) -> Option<Vec<ServiceRecord>> {
        let order = match mode {
            ServiceSort::All => "ORDER BY services.id",
            ServiceSort::ByProperty => "ORDER BY services.property_id ASC, services.id",
            ServiceSort::ByDate => "ORDER BY services.service_date DESC, services.id",
        };
        let sql = format!("{} {}", SELECT_SERVICES, order);

        self.store
            .fetch_rows(sqlx::query_as::<_, ServiceRecord>(&sql), limit, "list services")
            .await
    }

    /// Token form of [`list`](Self::list): `all`, `property`, `date`.
    pub async fn list_by_token(&self, token: &str, raw_limit: i64) -> Option<Listing<ServiceRecord>> {
        let resolved = resolve_token::<ServiceSort>(token);
        let rows = self.list(resolved.mode, RowLimit::from_raw(raw_limit)).await?;
        Some(Listing {
            rows,
            warning: resolved.warning,
        })
    }
}
