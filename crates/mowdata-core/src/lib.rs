//! # mowdata-core: Pure Record Types for MowData
//!
//! MowData keeps the books for a landscaping business: clients, their
//! properties, the cities/states those properties sit in, and the service
//! visits performed at each property. This crate holds everything about
//! those records that does not touch the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MowData Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Interactive menu (external)                     │   │
//! │  │   collects raw text ──► validation ──► typed store calls       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mowdata-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   sort    │  │ validation│  │   │
//! │  │   │ New*/     │  │   Cost    │  │ ClientSort│  │ phone,zip │  │   │
//! │  │   │ *Record   │  │ (cents)   │  │ ...       │  │ date,cost │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 mowdata-db (Data Store)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records, new-record inputs, `RowLimit`, the state list
//! - [`money`] - `Cost`, integer cents capped at $999.99
//! - [`sort`] - Per-entity sort modes with token fallback
//! - [`card`] - Text cards for listing and confirming records
//! - [`validation`] - Raw input checks and normalizers
//! - [`error`] - `ValidationError`
//!
//! ## Example Usage
//!
//! ```rust
//! use mowdata_core::{NewClient, validation::validate_phone};
//!
//! let client = NewClient::new("Luis", "Jaco", "123-456-7890", "LuisJaco@fake.com").normalized();
//! validate_phone(&client.phone).unwrap();
//! assert_eq!(client.first_name, "luis");
//! ```

pub mod card;
pub mod error;
pub mod money;
pub mod sort;
pub mod types;
pub mod validation;

pub use error::{ValidationError, ValidationResult};
pub use money::Cost;
pub use sort::{CitySort, ClientSort, PropertySort, Resolved, ServiceSort, SortMode};
pub use types::*;
