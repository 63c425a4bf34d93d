//! # Money Module
//!
//! Provides the `Cost` type for the price charged for a service visit.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A service cost has exactly two decimal places and tops out at         │
//! │  $999.99, so it is stored as whole cents: 0 ..= 99_999.                │
//! │                                                                         │
//! │    "400.00"  ──parse──►  Cost(40000)  ──display──►  "400.00"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mowdata_core::money::Cost;
//!
//! let cost: Cost = "400".parse().unwrap();
//! assert_eq!(cost.cents(), 40_000);
//! assert_eq!(cost.to_string(), "400.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};

/// Largest cost a service can carry, in cents ($999.99).
pub const MAX_COST_CENTS: i64 = 99_999;

/// The price of one service visit, in cents.
///
/// Always within `0..=MAX_COST_CENTS`; the constructors enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Cost(i64);

impl Cost {
    /// Creates a cost from cents, rejecting negatives and anything above $999.99.
    ///
    /// ## Example
    /// ```rust
    /// use mowdata_core::money::Cost;
    ///
    /// assert!(Cost::from_cents(9_000).is_ok());
    /// assert!(Cost::from_cents(100_000).is_err());
    /// assert!(Cost::from_cents(-1).is_err());
    /// ```
    pub fn from_cents(cents: i64) -> ValidationResult<Self> {
        if !(0..=MAX_COST_CENTS).contains(&cents) {
            return Err(ValidationError::OutOfRange {
                field: "cost".to_string(),
                min: 0,
                max: MAX_COST_CENTS,
            });
        }
        Ok(Cost(cents))
    }

    /// Creates a cost from whole dollars and cents.
    pub fn from_dollars_cents(dollars: i64, cents: i64) -> ValidationResult<Self> {
        if !(0..100).contains(&cents) {
            return Err(ValidationError::invalid("cost", "cents must be 0-99"));
        }
        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "cost".to_string(),
                min: 0,
                max: MAX_COST_CENTS,
            })
            .and_then(Cost::from_cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole-dollar part.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Cents part (0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        self.0 % 100
    }

    /// Dollars as a two-decimal number, the form `NUMERIC(5, 2)` columns hold.
    ///
    /// Exact enough for every value up to 999.99: reading it back with
    /// `round(v * 100)` returns the same cents.
    pub fn to_numeric(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Renders as plain `dollars.cents`, e.g. `400.00`. Cards prepend the `$`.
impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.dollars(), self.cents_part())
    }
}

/// Parses user input such as `400`, `90.5`, `400.00` or `$12.34`.
///
/// More than two decimal places is an error rather than a silent rounding.
impl FromStr for Cost {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        if s.is_empty() {
            return Err(ValidationError::required("cost"));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(ValidationError::invalid("cost", "expected a number like 400.00"));
        }
        if frac.len() > 2 {
            return Err(ValidationError::invalid("cost", "at most two decimal places"));
        }
        // "99999999999" would overflow long before the range check
        if whole.len() > 3 {
            return Err(ValidationError::OutOfRange {
                field: "cost".to_string(),
                min: 0,
                max: MAX_COST_CENTS,
            });
        }

        let dollars: i64 = whole
            .parse()
            .map_err(|_| ValidationError::invalid("cost", "expected a number like 400.00"))?;
        let cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().unwrap_or(0) * 10,
            _ => frac.parse::<i64>().unwrap_or(0),
        };

        Cost::from_dollars_cents(dollars, cents)
    }
}

impl TryFrom<i64> for Cost {
    type Error = ValidationError;

    fn try_from(cents: i64) -> Result<Self, Self::Error> {
        Cost::from_cents(cents)
    }
}

impl From<Cost> for i64 {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_bounds() {
        assert_eq!(Cost::from_cents(0).unwrap().cents(), 0);
        assert_eq!(Cost::from_cents(MAX_COST_CENTS).unwrap().cents(), 99_999);
        assert!(Cost::from_cents(MAX_COST_CENTS + 1).is_err());
        assert!(Cost::from_cents(-5).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from_cents(40_000).unwrap().to_string(), "400.00");
        assert_eq!(Cost::from_cents(9_000).unwrap().to_string(), "90.00");
        assert_eq!(Cost::from_cents(5).unwrap().to_string(), "0.05");
        assert_eq!(Cost::from_cents(99_999).unwrap().to_string(), "999.99");
    }

    #[test]
    fn test_parse() {
        assert_eq!("400".parse::<Cost>().unwrap().cents(), 40_000);
        assert_eq!("400.00".parse::<Cost>().unwrap().cents(), 40_000);
        assert_eq!("90.5".parse::<Cost>().unwrap().cents(), 9_050);
        assert_eq!("$12.34".parse::<Cost>().unwrap().cents(), 1_234);
        assert_eq!(" 0.07 ".parse::<Cost>().unwrap().cents(), 7);
    }

    #[test]
    fn test_from_dollars_cents_overflow_is_out_of_range() {
        let err = Cost::from_dollars_cents(i64::MAX / 10, 0).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert!(Cost::from_dollars_cents(i64::MAX, 99).is_err());
        assert_eq!(Cost::from_dollars_cents(999, 99).unwrap().cents(), MAX_COST_CENTS);
    }

    #[test]
    fn test_numeric_form_rounds_back_to_cents() {
        for cents in [0, 5, 1_234, 9_050, 40_000, MAX_COST_CENTS] {
            let numeric = Cost::from_cents(cents).unwrap().to_numeric();
            assert_eq!((numeric * 100.0).round() as i64, cents);
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Cost>().is_err());
        assert!("abc".parse::<Cost>().is_err());
        assert!("1.234".parse::<Cost>().is_err());
        assert!("1000".parse::<Cost>().is_err());
        assert!("-5".parse::<Cost>().is_err());
        assert!(".50".parse::<Cost>().is_err());
    }

    #[test]
    fn test_serde_as_cents() {
        let cost = Cost::from_cents(40_000).unwrap();
        assert_eq!(serde_json::to_string(&cost).unwrap(), "40000");
        let back: Cost = serde_json::from_str("9000").unwrap();
        assert_eq!(back.cents(), 9_000);
        assert!(serde_json::from_str::<Cost>("100000").is_err());
    }
}
