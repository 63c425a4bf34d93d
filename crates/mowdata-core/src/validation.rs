//! # Validation Module
//!
//! Input checks the presentation layer runs on raw text before calling the
//! data store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Menu (raw text)                                              │
//! │  └── THIS MODULE: phone / zip / abbreviation / date / cost formats     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Data store (mowdata-db)                                      │
//! │  ├── Normalization (lowercase, digits-only phone)                      │
//! │  └── Existence checks for referenced rows                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (length, digits, cost range)                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mowdata_core::validation::{normalize_phone, validate_phone, validate_zip};
//!
//! let phone = normalize_phone("123-456-7890");
//! validate_phone(&phone).unwrap();
//! validate_zip("11801").unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Cost;

/// Phone numbers are stored as exactly ten digits.
pub const PHONE_LEN: usize = 10;

/// Zip codes are stored as exactly five digits.
pub const ZIP_LEN: usize = 5;

/// State abbreviations are two letters.
pub const ABBREVIATION_LEN: usize = 2;

/// `VARCHAR(50)` columns: names, addresses, emails.
pub const MAX_TEXT_LEN: usize = 50;

// =============================================================================
// Normalizers
// =============================================================================

/// Keeps only the digits of a phone number: `"(123) 456-7890"` → `"1234567890"`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Uppercases and trims a state abbreviation: `" ny"` → `"NY"`.
pub fn normalize_abbreviation(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Renders a stored ten-digit phone as `(123) 456-7890`.
///
/// Anything that is not ten ASCII digits is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    if phone.len() != PHONE_LEN || !is_digits(phone) {
        return phone.to_string();
    }
    format!("({}) {}-{}", &phone[0..3], &phone[3..6], &phone[6..10])
}

// =============================================================================
// Validators
// =============================================================================

/// A digits-only, ten character phone number.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_digits("phone", phone, PHONE_LEN)
}

/// A digits-only, five character zip code.
pub fn validate_zip(zip: &str) -> ValidationResult<()> {
    validate_digits("zip", zip, ZIP_LEN)
}

/// Two ASCII letters, in either case.
pub fn validate_state_abbreviation(abbreviation: &str) -> ValidationResult<()> {
    let abbreviation = abbreviation.trim();
    if abbreviation.len() != ABBREVIATION_LEN {
        return Err(ValidationError::WrongLength {
            field: "state abbreviation".to_string(),
            len: ABBREVIATION_LEN,
        });
    }
    if !abbreviation.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid(
            "state abbreviation",
            "must be two letters",
        ));
    }
    Ok(())
}

/// Non-empty free text that fits a `VARCHAR(50)` column.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// Parses a cost typed by the user, see [`Cost`]'s `FromStr`.
pub fn parse_cost(raw: &str) -> ValidationResult<Cost> {
    raw.parse()
}

/// Parses a `YYYY-MM-DD` service date.
///
/// ## Example
/// ```rust
/// use mowdata_core::validation::parse_service_date;
///
/// assert!(parse_service_date("2024-08-05").is_ok());
/// assert!(parse_service_date("2024-02-30").is_err());
/// assert!(parse_service_date("08/05/2024").is_err());
/// ```
pub fn parse_service_date(raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 10 {
        return Err(ValidationError::invalid("date", "expected YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid("date", "expected a real YYYY-MM-DD date"))
}

fn validate_digits(field: &str, value: &str, len: usize) -> ValidationResult<()> {
    if value.len() != len {
        return Err(ValidationError::WrongLength {
            field: field.to_string(),
            len,
        });
    }
    if !is_digits(value) {
        return Err(ValidationError::invalid(field, "must contain only digits"));
    }
    Ok(())
}

fn is_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_and_format_phone() {
        let phone = normalize_phone("123-456-7890");
        assert_eq!(phone, "1234567890");
        assert_eq!(format_phone(&phone), "(123) 456-7890");

        assert_eq!(normalize_phone("(516) 555 0199"), "5165550199");
        assert_eq!(format_phone("12345"), "12345");
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("1234567890").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("12345678901").is_err());
        assert!(validate_phone("123456789a").is_err());
    }

    #[test]
    fn test_validate_zip() {
        assert!(validate_zip("11801").is_ok());
        assert!(validate_zip("01234").is_ok());
        assert!(validate_zip("1180").is_err());
        assert!(validate_zip("11a01").is_err());
    }

    #[test]
    fn test_validate_state_abbreviation() {
        assert!(validate_state_abbreviation("NY").is_ok());
        assert!(validate_state_abbreviation("ny").is_ok());
        assert!(validate_state_abbreviation("NYC").is_err());
        assert!(validate_state_abbreviation("N1").is_err());
        assert_eq!(normalize_abbreviation(" ny "), "NY");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("first name", "luis").is_ok());
        assert!(validate_name("first name", "  ").is_err());
        assert!(validate_name("address", &"a".repeat(51)).is_err());
        assert!(validate_name("address", &"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_parse_service_date() {
        let date = parse_service_date("2024-08-05").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 8, 5).unwrap());
        assert!(parse_service_date("2024-8-5").is_err());
        assert!(parse_service_date("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_cost() {
        assert_eq!(parse_cost("400.00").unwrap().cents(), 40_000);
        assert!(parse_cost("1000.00").is_err());
    }
}
