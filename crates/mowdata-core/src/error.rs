//! # Error Types
//!
//! Input validation errors for mowdata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mowdata-core errors (this file)                                       │
//! │  └── ValidationError  - Raw input rejected before reaching the store   │
//! │                                                                         │
//! │  mowdata-db errors (separate crate)                                    │
//! │  └── DbError          - Connection / constraint / query failures       │
//! │                                                                         │
//! │  Flow: raw text → ValidationError (re-prompt) → typed call → DbError   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// The presentation layer runs these checks on raw text before calling the
/// store, so a user sees the reason and can be re-prompted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long for its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value must be exactly `len` characters.
    #[error("{field} must be exactly {len} characters")]
    WrongLength { field: String, len: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (non-digit phone, malformed date, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("email");
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::WrongLength {
            field: "zip".to_string(),
            len: 5,
        };
        assert_eq!(err.to_string(), "zip must be exactly 5 characters");

        let err = ValidationError::invalid("phone", "digits only");
        assert_eq!(err.to_string(), "phone has invalid format: digits only");
    }
}
