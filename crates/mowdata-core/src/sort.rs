//! # Sort Modes
//!
//! Each list operation accepts a closed set of orderings. The menu hands us
//! a token (`"all"`, `"name"`, `"date"`, ...); anything unrecognized falls
//! back to `All` and the caller gets a warning to show, never an error.
//!
//! ```text
//!   "date"   ──► ServiceSort::ByDate   (ORDER BY service_date DESC)
//!   "name"   ──► ClientSort::ByName    (ORDER BY first_name, last_name)
//!   "banana" ──► ServiceSort::All  +  warning
//! ```

use serde::{Deserialize, Serialize};

/// A per-entity ordering that can be parsed from a menu token.
pub trait SortMode: Copy + Default + Sized + 'static {
    /// Accepted tokens and the mode each maps to.
    const TOKENS: &'static [(&'static str, Self)];

    /// Which entity this ordering belongs to, for warnings.
    const ENTITY: &'static str;

    /// Exact (case-insensitive) token lookup.
    fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::TOKENS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, mode)| *mode)
    }

    /// Token lookup with the `All` fallback.
    fn resolve(token: &str) -> Resolved<Self> {
        match Self::from_token(token) {
            Some(mode) => Resolved {
                mode,
                warning: None,
            },
            None => Resolved {
                mode: Self::default(),
                warning: Some(format!(
                    "Invalid sorting mode '{}' for {}, defaulting to \"all\".",
                    token,
                    Self::ENTITY
                )),
            },
        }
    }
}

/// The outcome of resolving a token: the mode plus any fallback warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<M> {
    pub mode: M,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientSort {
    #[default]
    All,
    /// First name, then last name, ascending.
    ByName,
}

impl SortMode for ClientSort {
    const TOKENS: &'static [(&'static str, Self)] =
        &[("all", ClientSort::All), ("name", ClientSort::ByName)];
    const ENTITY: &'static str = "clients";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CitySort {
    #[default]
    All,
    ByState,
    ByName,
}

impl SortMode for CitySort {
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("all", CitySort::All),
        ("state", CitySort::ByState),
        ("name", CitySort::ByName),
    ];
    const ENTITY: &'static str = "cities";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertySort {
    #[default]
    All,
    ByCity,
    ByClient,
}

impl SortMode for PropertySort {
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("all", PropertySort::All),
        ("city", PropertySort::ByCity),
        ("client", PropertySort::ByClient),
    ];
    const ENTITY: &'static str = "properties";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceSort {
    #[default]
    All,
    ByProperty,
    /// Most recent first.
    ByDate,
}

impl SortMode for ServiceSort {
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("all", ServiceSort::All),
        ("property", ServiceSort::ByProperty),
        ("date", ServiceSort::ByDate),
    ];
    const ENTITY: &'static str = "services";
}
