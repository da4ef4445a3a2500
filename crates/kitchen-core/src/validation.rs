//! # Validation Module
//!
//! Quantity checks applied at the edges of the stock workflow.
//!
//! ## Where Each Check Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  deduct_ingredients(product, count, ...)                               │
//! │       │                                                                 │
//! │       ├── validate_preparation_count(count)  ← before resolution        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  deduct_one(ingredient, quantity, ...)                                  │
//! │       │                                                                 │
//! │       └── validate_deduction_quantity(qty)   ← before any lookup        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates the number of products being prepared.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use kitchen_core::validation::validate_preparation_count;
///
/// assert!(validate_preparation_count(1).is_ok());
/// assert!(validate_preparation_count(0).is_err());
/// ```
pub fn validate_preparation_count(count: i64) -> ValidationResult<()> {
    if count <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "preparation count".to_string(),
            value: count as f64,
        });
    }

    Ok(())
}

/// Validates a single ingredient deduction quantity.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive (> 0); fractions are fine
pub fn validate_deduction_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "deduction quantity".to_string(),
        });
    }

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "deduction quantity".to_string(),
            value: quantity,
        });
    }

    Ok(())
}

/// Validates an entity id supplied by a caller.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}
