//! # Domain Types
//!
//! Records for the five MowData tables and the inputs used to create them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  State   │◄────│   City   │◄──┐ │  Client  │                        │
//! │  │ NY, CA.. │     │ zip (5)  │   │ │ phone(10)│                        │
//! │  └──────────┘     └──────────┘   │ └────▲─────┘                        │
//! │                                  │      │                               │
//! │                               ┌──┴──────┴──┐      ┌───────────────┐    │
//! │                               │  Property  │◄─────│    Service    │    │
//! │                               │  address   │ (nullable FK)        │    │
//! │                               └────────────┘      │ date, cost,   │    │
//! │                                                   │ 9 task flags  │    │
//! │                                                   └───────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Shapes Per Entity
//! - `New*` structs carry user input on its way into the store. Their
//!   `normalized()` method applies the storage conventions (lowercase text,
//!   digits-only phone, empty notes become `None`).
//! - `*Record` structs are list projections, already joined with the
//!   tables they reference.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Cost;

/// Database row identifier (`INTEGER PRIMARY KEY`).
pub type RowId = i64;

/// The fixed reference list seeded into `states` at bootstrap.
///
/// Order matters: ids are assigned in this order, so `NY` is id 32.
pub const US_STATES: [(&str, &str); 50] = [
    ("AL", "alabama"),
    ("AK", "alaska"),
    ("AZ", "arizona"),
    ("AR", "arkansas"),
    ("CA", "california"),
    ("CO", "colorado"),
    ("CT", "connecticut"),
    ("DE", "delaware"),
    ("FL", "florida"),
    ("GA", "georgia"),
    ("HI", "hawaii"),
    ("ID", "idaho"),
    ("IL", "illinois"),
    ("IN", "indiana"),
    ("IA", "iowa"),
    ("KS", "kansas"),
    ("KY", "kentucky"),
    ("LA", "louisiana"),
    ("ME", "maine"),
    ("MD", "maryland"),
    ("MA", "massachusetts"),
    ("MI", "michigan"),
    ("MN", "minnesota"),
    ("MS", "mississippi"),
    ("MO", "missouri"),
    ("MT", "montana"),
    ("NE", "nebraska"),
    ("NV", "nevada"),
    ("NH", "new hampshire"),
    ("NJ", "new jersey"),
    ("NM", "new mexico"),
    ("NY", "new york"),
    ("NC", "north carolina"),
    ("ND", "north dakota"),
    ("OH", "ohio"),
    ("OK", "oklahoma"),
    ("OR", "oregon"),
    ("PA", "pennsylvania"),
    ("RI", "rhode island"),
    ("SC", "south carolina"),
    ("SD", "south dakota"),
    ("TN", "tennessee"),
    ("TX", "texas"),
    ("UT", "utah"),
    ("VT", "vermont"),
    ("VA", "virginia"),
    ("WA", "washington"),
    ("WV", "west virginia"),
    ("WI", "wisconsin"),
    ("WY", "wyoming"),
];

// =============================================================================
// Row Limit
// =============================================================================

/// How many rows a list operation may produce.
///
/// The menu passes `-1` for "show everything"; any other negative is
/// treated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowLimit {
    #[default]
    Unlimited,
    AtMost(usize),
}

impl RowLimit {
    /// Converts the menu's integer convention (`-1` = unlimited).
    pub fn from_raw(n: i64) -> Self {
        if n < 0 {
            RowLimit::Unlimited
        } else {
            RowLimit::AtMost(usize::try_from(n).unwrap_or(usize::MAX))
        }
    }

    /// True once `produced` rows satisfy the limit.
    #[inline]
    pub fn is_reached(&self, produced: usize) -> bool {
        match self {
            RowLimit::Unlimited => false,
            RowLimit::AtMost(n) => produced >= *n,
        }
    }
}

impl From<i64> for RowLimit {
    fn from(n: i64) -> Self {
        RowLimit::from_raw(n)
    }
}

// =============================================================================
// Service Tasks
// =============================================================================

/// The nine kinds of work a service visit can include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ServiceTasks {
    pub mow: bool,
    pub leaf_blow: bool,
    pub seed: bool,
    pub fertilizer: bool,
    pub mulch: bool,
    pub remove_tree: bool,
    pub trim_tree: bool,
    pub power_wash: bool,
    pub snow_plow: bool,
}

impl ServiceTasks {
    /// Card labels, in column order.
    pub const LABELS: [&'static str; 9] = [
        "MOW",
        "LEAF BLOW",
        "SEED",
        "FERTILIZER",
        "MULCH",
        "TREE REMOVAL",
        "TREE TRIM",
        "POWER WASH",
        "SNOW PLOW",
    ];

    /// Builds the set from flags in column order
    /// (mow, leaf blow, seed, fertilizer, mulch, tree removal, tree trim,
    /// power wash, snow plow).
    pub const fn from_flags(flags: [bool; 9]) -> Self {
        ServiceTasks {
            mow: flags[0],
            leaf_blow: flags[1],
            seed: flags[2],
            fertilizer: flags[3],
            mulch: flags[4],
            remove_tree: flags[5],
            trim_tree: flags[6],
            power_wash: flags[7],
            snow_plow: flags[8],
        }
    }

    /// Flags in column order.
    pub const fn flags(&self) -> [bool; 9] {
        [
            self.mow,
            self.leaf_blow,
            self.seed,
            self.fertilizer,
            self.mulch,
            self.remove_tree,
            self.trim_tree,
            self.power_wash,
            self.snow_plow,
        ]
    }
}

// =============================================================================
// New-Record Inputs
// =============================================================================

/// A client about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    /// Ten digits once normalized.
    pub phone: String,
    pub email: String,
}

impl NewClient {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        NewClient {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Lowercases names and email, strips punctuation from the phone.
    pub fn normalized(&self) -> Self {
        NewClient {
            first_name: normalize_text(&self.first_name),
            last_name: normalize_text(&self.last_name),
            phone: crate::validation::normalize_phone(&self.phone),
            email: normalize_text(&self.email),
        }
    }
}

/// A city about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub zip: String,
    pub state_id: RowId,
}

impl NewCity {
    pub fn new(name: impl Into<String>, zip: impl Into<String>, state_id: RowId) -> Self {
        NewCity {
            name: name.into(),
            zip: zip.into(),
            state_id,
        }
    }

    pub fn normalized(&self) -> Self {
        NewCity {
            name: normalize_text(&self.name),
            zip: self.zip.trim().to_string(),
            state_id: self.state_id,
        }
    }
}

/// A property about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub client_id: RowId,
    pub address: String,
    pub city_id: RowId,
}

impl NewProperty {
    pub fn new(client_id: RowId, address: impl Into<String>, city_id: RowId) -> Self {
        NewProperty {
            client_id,
            address: address.into(),
            city_id,
        }
    }

    pub fn normalized(&self) -> Self {
        NewProperty {
            client_id: self.client_id,
            address: normalize_text(&self.address),
            city_id: self.city_id,
        }
    }
}

/// A service visit about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub property_id: RowId,
    pub date: NaiveDate,
    pub tasks: ServiceTasks,
    pub cost: Cost,
    pub notes: Option<String>,
}

impl NewService {
    /// An empty `notes` string is stored as NULL.
    pub fn new(
        property_id: RowId,
        date: NaiveDate,
        tasks: ServiceTasks,
        cost: Cost,
        notes: impl Into<String>,
    ) -> Self {
        let notes = notes.into();
        NewService {
            property_id,
            date,
            tasks,
            cost,
            notes: if notes.is_empty() { None } else { Some(notes) },
        }
    }

    /// Notes keep their case; blank notes collapse to `None`.
    pub fn normalized(&self) -> Self {
        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        NewService {
            notes,
            ..self.clone()
        }
    }
}

fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

// =============================================================================
// List Projections
// =============================================================================

/// A row of `clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ClientRecord {
    pub id: RowId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

/// A row of `cities` joined with its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CityRecord {
    pub id: RowId,
    pub name: String,
    pub zip: String,
    pub state_id: RowId,
    pub state_abbreviation: String,
    pub state_name: String,
}

/// A row of `properties` joined with its owner and city/state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PropertyRecord {
    pub id: RowId,
    pub client_id: RowId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city_id: RowId,
    pub city_name: String,
    pub zip: String,
    pub state_abbreviation: String,
}

/// A row of `services` joined with its property and city/state.
///
/// Location fields are `None` once the property has been deleted
/// (the foreign key is set to NULL, the service row survives).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ServiceRecord {
    pub id: RowId,
    pub property_id: Option<RowId>,
    pub address: Option<String>,
    pub city_name: Option<String>,
    pub zip: Option<String>,
    pub state_abbreviation: Option<String>,
    pub service_date: NaiveDate,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "i64"))]
    pub cost: Cost,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub tasks: ServiceTasks,
    pub notes: Option<String>,
}
