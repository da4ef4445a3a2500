//! # Availability Evaluation
//!
//! Read-only answer to "can this preparation go ahead?".
//!
//! ## Per-Requirement Decision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock < needed                  → Shortfall  (deficit = needed-stock) │
//! │  stock - needed <= minimum       → LowStockWarning (still sufficient)  │
//! │  otherwise                       → Sufficient                          │
//! │                                                                         │
//! │  report.sufficient  ⇔  no shortfalls                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The report types are shared with the kitchen screen, so they derive `TS`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::resolution::Requirement;
use crate::types::{Ingredient, LinkRole, Product};

// =============================================================================
// Report Entries
// =============================================================================

/// An ingredient the preparation would run out of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Shortfall {
    pub ingredient_id: String,
    pub name: String,
    pub current_stock: f64,
    pub quantity_needed: f64,
    pub unit: String,
    pub role: LinkRole,
    pub product_name: String,
    /// needed − current
    pub deficit: f64,
}

/// An ingredient that suffices but would end at or below its minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LowStockWarning {
    pub ingredient_id: String,
    pub name: String,
    /// Stock before the preparation.
    pub current_stock: f64,
    pub minimum_stock: f64,
    pub stock_after: f64,
    pub unit: String,
}

/// Outcome of evaluating one requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    Sufficient,
    Low(LowStockWarning),
    Short(Shortfall),
}

/// Evaluates one requirement against the ingredient's current stock.
pub fn evaluate(ingredient: &Ingredient, requirement: &Requirement, product_name: &str) -> Availability {
    let needed = requirement.quantity_needed;
    let current = ingredient.current_stock;

    if !ingredient.can_cover(needed) {
        return Availability::Short(Shortfall {
            ingredient_id: ingredient.id.clone(),
            name: ingredient.name.clone(),
            current_stock: current,
            quantity_needed: needed,
            unit: ingredient.unit.clone(),
            role: requirement.role,
            product_name: product_name.to_string(),
            deficit: needed - current,
        });
    }

    let after = ingredient.stock_after(needed);
    if ingredient.is_low(after) {
        return Availability::Low(LowStockWarning {
            ingredient_id: ingredient.id.clone(),
            name: ingredient.name.clone(),
            current_stock: current,
            minimum_stock: ingredient.minimum_stock,
            stock_after: after,
            unit: ingredient.unit.clone(),
        });
    }

    Availability::Sufficient
}

// =============================================================================
// Validation Report
// =============================================================================

/// Result of an availability check for a whole preparation.
///
/// Errors travel in-band through `error`; building a report never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ValidationReport {
    pub product_id: String,
    pub sufficient: bool,
    pub product_name: Option<String>,
    pub shortfalls: Vec<Shortfall>,
    pub warnings: Vec<LowStockWarning>,
    /// Informational note (e.g. product has no ingredients).
    pub message: Option<String>,
    /// Why the check could not be completed.
    pub error: Option<String>,
}

impl ValidationReport {
    /// Empty, sufficient report for `product`, ready to collect evaluations.
    pub fn for_product(product: &Product) -> Self {
        ValidationReport {
            product_id: product.id.clone(),
            sufficient: true,
            product_name: Some(product.name.clone()),
            shortfalls: Vec::new(),
            warnings: Vec::new(),
            message: None,
            error: None,
        }
    }

    /// Report for a product that needs no ingredients.
    pub fn no_ingredients(product: &Product) -> Self {
        ValidationReport {
            message: Some("Product has no ingredients - no validation required".to_string()),
            ..Self::for_product(product)
        }
    }

    /// Failed report carrying `error`.
    pub fn failed(product_id: impl Into<String>, error: impl Into<String>) -> Self {
        ValidationReport {
            product_id: product_id.into(),
            sufficient: false,
            product_name: None,
            shortfalls: Vec::new(),
            warnings: Vec::new(),
            message: None,
            error: Some(error.into()),
        }
    }

    /// Failed report for an unknown product id.
    pub fn product_not_found(product_id: impl Into<String>) -> Self {
        Self::failed(product_id, "Product not found")
    }

    /// Folds one evaluation into the report.
    pub fn record(&mut self, availability: Availability) {
        match availability {
            Availability::Sufficient => {}
            Availability::Low(warning) => self.warnings.push(warning),
            Availability::Short(shortfall) => {
                self.shortfalls.push(shortfall);
                self.sufficient = false;
            }
        }
    }
}
