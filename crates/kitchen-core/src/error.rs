//! # Errors
//!
//! Rule failures raised by the pure preparation logic. Store and side-effect
//! failures belong to the crates that perform I/O.
//!
//! ```text
//! ValidationError ──► CoreError ──► StockError (kitchen-stock)
//!   bad count            resolution      + store, sync and log failures
//!   bad quantity         refused
//! ```

use thiserror::Error;

/// A preparation request the rules refuse to resolve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// The field that failed validation, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::Validation(v) => Some(v.field()),
        }
    }
}

/// A single input value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    /// Preparation counts and deduction quantities must both be above zero.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: f64 },

    /// NaN or infinity.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field, .. }
            | ValidationError::NotFinite { field } => field,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_be_positive_message() {
        let err = ValidationError::MustBePositive {
            field: "preparation count".to_string(),
            value: 0.0,
        };
        assert_eq!(err.to_string(), "preparation count must be positive, got 0");
        assert_eq!(err.field(), "preparation count");
    }

    #[test]
    fn test_validation_lifts_into_core_error() {
        let core: CoreError = ValidationError::NotFinite {
            field: "deduction quantity".to_string(),
        }
        .into();

        assert_eq!(core.field(), Some("deduction quantity"));
        assert_eq!(
            core.to_string(),
            "Invalid input: deduction quantity must be a finite number"
        );
    }
}
