//! # Schema Bootstrap
//!
//! The five MowData tables, the catalog probe that detects them, and the
//! seed data loaded when they are first created.
//!
//! ## Bootstrap Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  Store opened                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tables_present() ── probe sqlite_master for all five names            │
//! │       │                                                                 │
//! │       ├── all five? ──► ready, nothing is created or seeded            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_schema()  ── one transaction, five CREATE TABLE                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  seed_states()    ── refuses if `states` already has rows              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  seed_sample_data() (optional)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Referential Actions
//! ```text
//!   cities.state_id      → states      ON DELETE RESTRICT  ON UPDATE CASCADE
//!   properties.client_id → clients     ON DELETE CASCADE   ON UPDATE CASCADE
//!   properties.city_id   → cities      ON DELETE CASCADE   ON UPDATE CASCADE
//!   services.property_id → properties  ON DELETE SET NULL  ON UPDATE CASCADE
//! ```
//! These are part of the on-disk contract, not incidental.
//!
//! Column names and types match the layout existing MowData databases
//! use, including `service_cost NUMERIC(5, 2)`. The SQLite-only additions
//! are `CHECK`s standing in for what the column types enforce elsewhere:
//! the cost range and a valid `service_date`.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use mowdata_core::US_STATES;

use crate::error::{DbError, DbResult};

/// Every table the store needs, in creation order.
pub const TABLE_NAMES: [&str; 5] = ["states", "clients", "cities", "properties", "services"];

const CREATE_STATES: &str = r#"
CREATE TABLE states (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    abbreviation VARCHAR(2) NOT NULL,
    name VARCHAR(50) NOT NULL,
    CHECK (length(abbreviation) = 2)
)
"#;

const CREATE_CLIENTS: &str = r#"
CREATE TABLE clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    phone VARCHAR(10) NOT NULL,
    email VARCHAR(50) NOT NULL,
    CHECK (length(phone) = 10)
)
"#;

const CREATE_CITIES: &str = r#"
CREATE TABLE cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50) NOT NULL,
    zip VARCHAR(5) NOT NULL,
    state_id INTEGER NOT NULL,
    CHECK (length(zip) = 5),
    FOREIGN KEY (state_id)
        REFERENCES states(id)
        ON DELETE RESTRICT
        ON UPDATE CASCADE
)
"#;

const CREATE_PROPERTIES: &str = r#"
CREATE TABLE properties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    address VARCHAR(50) NOT NULL,
    city_id INTEGER NOT NULL,
    FOREIGN KEY (client_id)
        REFERENCES clients(id)
        ON DELETE CASCADE
        ON UPDATE CASCADE,
    FOREIGN KEY (city_id)
        REFERENCES cities(id)
        ON DELETE CASCADE
        ON UPDATE CASCADE
)
"#;

const CREATE_SERVICES: &str = r#"
CREATE TABLE services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    property_id INTEGER,
    service_date DATE NOT NULL,
    service_cost NUMERIC(5, 2) NOT NULL,
    mow BOOLEAN NOT NULL,
    leaf_blow BOOLEAN NOT NULL,
    seed BOOLEAN NOT NULL,
    fertilizer BOOLEAN NOT NULL,
    mulch BOOLEAN NOT NULL,
    remove_tree BOOLEAN NOT NULL,
    trim_tree BOOLEAN NOT NULL,
    power_wash BOOLEAN NOT NULL,
    snow_plow BOOLEAN NOT NULL,
    notes TEXT,
    CHECK (service_cost BETWEEN 0 AND 999.99),
    CHECK (service_date IS date(service_date)),
    FOREIGN KEY (property_id)
        REFERENCES properties(id)
        ON DELETE SET NULL
        ON UPDATE CASCADE
)
"#;

/// All CREATE TABLE statements in dependency order.
pub fn all_schema_statements() -> [&'static str; 5] {
    [
        CREATE_STATES,
        CREATE_CLIENTS,
        CREATE_CITIES,
        CREATE_PROPERTIES,
        CREATE_SERVICES,
    ]
}

/// Probes the catalog for all five tables.
///
/// Read-only, safe to call at any time.
pub async fn tables_present(pool: &SqlitePool) -> DbResult<bool> {
    let found: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM sqlite_master
        WHERE type = 'table'
        AND name IN (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(TABLE_NAMES[0])
    .bind(TABLE_NAMES[1])
    .bind(TABLE_NAMES[2])
    .bind(TABLE_NAMES[3])
    .bind(TABLE_NAMES[4])
    .fetch_one(pool)
    .await?;

    debug!(found, "Probed catalog for MowData tables");
    Ok(found == TABLE_NAMES.len() as i64)
}

/// Creates the five tables in one transaction.
///
/// Callers gate this on [`tables_present`] returning false; a partial
/// schema (some tables already there) fails and rolls back untouched.
pub async fn create_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Creating MowData tables");

    let mut tx = pool.begin().await?;
    for stmt in all_schema_statements() {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Created MowData tables");
    Ok(())
}

/// Counts rows in one of the five tables.
pub async fn count_rows(pool: &SqlitePool, table: &str) -> DbResult<i64> {
    if !TABLE_NAMES.contains(&table) {
        return Err(DbError::QueryFailed(format!("unknown table '{}'", table)));
    }
    // Table names cannot be bound; `table` is one of the constants above
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}

/// Inserts the 50 reference states.
///
/// ## Duplicate Guard
/// Seeding only happens on an empty `states` table; otherwise this
/// returns [`DbError::AlreadySeeded`] and writes nothing.
pub async fn seed_states(pool: &SqlitePool) -> DbResult<()> {
    let existing = count_rows(pool, "states").await?;
    if existing > 0 {
        warn!(existing, "States table already populated, not seeding");
        return Err(DbError::AlreadySeeded(existing));
    }

    let mut tx = pool.begin().await?;
    for (abbreviation, name) in US_STATES {
        sqlx::query("INSERT INTO states (abbreviation, name) VALUES (?1, ?2)")
            .bind(abbreviation)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!(count = US_STATES.len(), "Seeded states table");
    Ok(())
}

/// Sample clients, cities, properties and services for trying the app out.
///
/// ```text
///   clients:    luis jaco (1), jim bob (2)
///   cities:     hicksville 11801 (1), levittown 11756 (2), both NY
///   properties: 57 apple ln (client 1, city 1), 38 orange rd (1, 2),
///               58 apple ln (2, 1)
///   services:   2024-08-05 at property 1 ($400.00),
///               2024-08-13 at property 3 ($90.00)
/// ```
const SAMPLE_STATEMENTS: [&str; 4] = [
    r#"
    INSERT INTO clients (first_name, last_name, phone, email)
    VALUES
        ('luis', 'jaco', '1234567890', 'luisjaco@fake.com'),
        ('jim', 'bob', '8888888888', 'jimbob@guy.com')
    "#,
    r#"
    INSERT INTO cities (name, zip, state_id)
    VALUES
        ('hicksville', '11801', (SELECT id FROM states WHERE abbreviation = 'NY')),
        ('levittown', '11756', (SELECT id FROM states WHERE abbreviation = 'NY'))
    "#,
    r#"
    INSERT INTO properties (client_id, address, city_id)
    VALUES
        (1, '57 apple ln', 1),
        (1, '38 orange rd', 2),
        (2, '58 apple ln', 1)
    "#,
    r#"
    INSERT INTO services (property_id, service_date, service_cost,
                          mow, leaf_blow, seed,
                          fertilizer, mulch, remove_tree,
                          trim_tree, power_wash, snow_plow,
                          notes)
    VALUES
        (1, '2024-08-05', 400.00,
         1, 0, 0,
         1, 0, 1,
         1, 0, 0,
         'dead tree on property, ask client for removal'),
        (3, '2024-08-13', 90.00,
         1, 0, 0,
         1, 0, 0,
         0, 0, 0,
         NULL)
    "#,
];

/// Inserts the sample dataset. Expects seeded states and empty entity tables.
pub async fn seed_sample_data(pool: &SqlitePool) -> DbResult<()> {
    let existing = count_rows(pool, "clients").await?;
    if existing > 0 {
        warn!(existing, "Clients table not empty, skipping sample data");
        return Err(DbError::QueryFailed(
            "sample data needs an empty clients table".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    for stmt in SAMPLE_STATEMENTS {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Inserted sample data");
    Ok(())
}
