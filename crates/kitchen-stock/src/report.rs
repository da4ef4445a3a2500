//! # Deduction Report
//!
//! Explicit outcome of `deduct_ingredients`: one entry per ingredient that
//! took part, plus whether the request was refused before touching stock.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use kitchen_core::LowStockWarning;

use crate::error::StockError;

/// How one ingredient's deduction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OutcomeStatus {
    /// Stock decreased.
    Deducted,
    /// Ingredient is not deductible; nothing changed.
    NotDeductible,
    /// Stock could not cover the quantity; an error movement was written.
    Rejected,
    /// Invalid quantity, unknown ingredient or a store failure.
    Failed,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Deducted | OutcomeStatus::NotDeductible)
    }
}

/// Result of `deduct_one` for a single ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IngredientOutcome {
    pub ingredient_id: String,
    /// Empty when the ingredient could not be loaded.
    pub name: String,
    pub quantity: f64,
    pub status: OutcomeStatus,
    pub stock_before: Option<f64>,
    pub stock_after: Option<f64>,
    pub low_stock: Option<LowStockWarning>,
    /// Why the deduction did not happen.
    pub error: Option<String>,
    /// Mirror sync failure after a successful deduction.
    pub sync_error: Option<String>,
    /// Audit write failure. Never changes `status`.
    pub log_error: Option<String>,
}

impl IngredientOutcome {
    pub(crate) fn new(ingredient_id: &str, quantity: f64) -> Self {
        IngredientOutcome {
            ingredient_id: ingredient_id.to_string(),
            name: String::new(),
            quantity,
            status: OutcomeStatus::Failed,
            stock_before: None,
            stock_after: None,
            low_stock: None,
            error: None,
            sync_error: None,
            log_error: None,
        }
    }

    pub(crate) fn fail(mut self, status: OutcomeStatus, err: &StockError) -> Self {
        self.status = status;
        self.error = Some(err.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of one `deduct_ingredients` call. Building it never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeductionReport {
    pub product_id: String,
    pub product_name: Option<String>,
    /// Preparation count as requested.
    pub quantity: i64,
    /// True when nothing was attempted (bad count, unknown product).
    pub rejected: bool,
    pub error: Option<String>,
    /// Product needs no ingredients.
    pub no_ingredients: bool,
    pub outcomes: Vec<IngredientOutcome>,
    /// Optional ingredient ids left out because they were not selected.
    pub skipped_optional: Vec<String>,
}

impl DeductionReport {
    pub(crate) fn new(product_id: &str, quantity: i64) -> Self {
        DeductionReport {
            product_id: product_id.to_string(),
            product_name: None,
            quantity,
            rejected: false,
            error: None,
            no_ingredients: false,
            outcomes: Vec::new(),
            skipped_optional: Vec::new(),
        }
    }

    pub(crate) fn refuse(mut self, err: &StockError) -> Self {
        self.rejected = true;
        self.error = Some(err.to_string());
        self
    }

    /// Ingredients whose stock actually went down.
    pub fn deducted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Deducted)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &IngredientOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Not refused, and every participating ingredient succeeded.
    pub fn is_complete(&self) -> bool {
        !self.rejected && self.outcomes.iter().all(IngredientOutcome::is_success)
    }

    pub fn outcome(&self, ingredient_id: &str) -> Option<&IngredientOutcome> {
        self.outcomes.iter().find(|o| o.ingredient_id == ingredient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, status: OutcomeStatus) -> IngredientOutcome {
        IngredientOutcome {
            status,
            ..IngredientOutcome::new(id, 1.0)
        }
    }

    #[test]
    fn test_partial_report() {
        let mut report = DeductionReport::new("burger", 1);
        report.outcomes.push(outcome("bun", OutcomeStatus::Deducted));
        report.outcomes.push(outcome("salt", OutcomeStatus::NotDeductible));
        report.outcomes.push(outcome("cheese", OutcomeStatus::Rejected));

        assert_eq!(report.deducted_count(), 1);
        assert!(!report.is_complete());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.outcome("cheese").map(|o| o.status), Some(OutcomeStatus::Rejected));
    }

    #[test]
    fn test_refused_report() {
        let report = DeductionReport::new("burger", 0)
            .refuse(&StockError::InvalidQuantity("preparation count: 0".into()));
        assert!(report.rejected);
        assert!(!report.is_complete());
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = DeductionReport::new("burger", 2);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["productId"], "burger");
        assert_eq!(json["skippedOptional"], serde_json::json!([]));
    }
}
