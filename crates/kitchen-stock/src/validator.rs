//! # Stock Validator
//!
//! Read-only availability check for a preparation. Resolves the same
//! ingredient list a deduction would and evaluates each entry against
//! current stock without writing anything.

use std::sync::Arc;

use kitchen_core::availability::evaluate;
use kitchen_core::resolution::resolve_requirements;
use kitchen_core::{SelectedIngredients, ValidationReport};
use tracing::{debug, warn};

use crate::error::StockError;
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct StockValidator {
    store: Arc<dyn LedgerStore>,
}

impl StockValidator {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        StockValidator { store }
    }

    /// Checks whether `quantity` units of `product_id` can be prepared.
    ///
    /// Never fails: problems come back in `ValidationReport::error`.
    pub async fn check_availability(
        &self,
        product_id: &str,
        quantity: i64,
        selected: &SelectedIngredients,
    ) -> ValidationReport {
        let product = match self.store.find_product(product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => return ValidationReport::product_not_found(product_id),
            Err(e) => return ValidationReport::failed(product_id, StockError::Store(e).to_string()),
        };

        if !product.has_ingredients {
            return ValidationReport::no_ingredients(&product);
        }

        let plan = match resolve_requirements(&product, quantity, selected) {
            Ok(plan) => plan,
            Err(e) => return ValidationReport::failed(product_id, StockError::from(e).to_string()),
        };

        let mut report = ValidationReport::for_product(&product);

        for requirement in &plan.requirements {
            let ingredient = match self.store.find_ingredient(&requirement.ingredient_id).await {
                Ok(Some(ingredient)) => ingredient,
                Ok(None) => {
                    warn!(
                        %product_id,
                        ingredient_id = %requirement.ingredient_id,
                        name = %requirement.name,
                        "Ingredient referenced by product not found, not validated"
                    );
                    continue;
                }
                Err(e) => {
                    let mut failed = ValidationReport::failed(product_id, StockError::Store(e).to_string());
                    failed.product_name = Some(product.name.clone());
                    return failed;
                }
            };

            report.record(evaluate(&ingredient, requirement, &product.name));
        }

        debug!(
            %product_id,
            quantity,
            sufficient = report.sufficient,
            shortfalls = report.shortfalls.len(),
            warnings = report.warnings.len(),
            "Availability checked"
        );

        report
    }
}
