//! # Database Bootstrap Tool
//!
//! Creates a MowData database file, its five tables and the 50 reference
//! states. Optionally loads a small sample dataset for trying the menu.
//!
//! ## Usage
//! ```bash
//! # Bootstrap ./mowdata.db (created if missing)
//! cargo run -p mowdata-db --bin seed
//!
//! # Include sample clients, cities, properties and services
//! cargo run -p mowdata-db --bin seed -- --sample
//!
//! # Specify database path
//! cargo run -p mowdata-db --bin seed -- --db ./data/mowdata.db
//! ```
//!
//! `MOWDATA_DB` sets the path when `--db` is not given. Running against an
//! already bootstrapped file changes nothing.

use std::env;
use tracing_subscriber::EnvFilter;

use mowdata_core::{ServiceSort, RowLimit};
use mowdata_db::schema::TABLE_NAMES;
use mowdata_db::{Bootstrap, Database, DbConfig, Seed, Store};

const DEFAULT_DB_PATH: &str = "./mowdata.db";

/// Log filter: `RUST_LOG` wins, otherwise info with quiet sqlx.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mowdata_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("MOWDATA_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let mut seed = Seed::StatesOnly;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--sample" | "-s" => seed = Seed::WithSampleData,
            "--help" | "-h" => {
                println!("MowData Database Bootstrap");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: {}, env MOWDATA_DB)", DEFAULT_DB_PATH);
                println!("  -s, --sample       Also load the sample dataset");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    init_tracing();

    println!("MowData Database Bootstrap");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::connect(DbConfig::new(&db_path).create_if_missing(true)).await?;
    let store = Store::open(db).await;

    match store.bootstrap(seed).await? {
        Bootstrap::AlreadyPresent => {
            println!("Tables already present, nothing to do.");
            println!("Delete the database file to start over.");
        }
        Bootstrap::Created { sample_data } => {
            println!("Created tables and seeded states.");
            if sample_data {
                println!("Loaded sample data.");
            }
        }
    }

    println!();
    for table in TABLE_NAMES {
        let count = store
            .count(table)
            .await
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        println!("  {:<12}{}", table, count);
    }

    if let Some(latest) = store
        .services()
        .list(ServiceSort::ByDate, RowLimit::AtMost(1))
        .await
        .and_then(|rows| rows.into_iter().next())
    {
        println!();
        println!("Most recent service:");
        println!("{}", latest);
    }

    store.close().await;
    Ok(())
}
