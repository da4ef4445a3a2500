//! # Ingredient Stock Service
//!
//! The two operations callers use: deduct a preparation's ingredients, and
//! check beforehand whether stock allows it.
//!
//! ## Deduction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  deduct_ingredients(product_id, quantity, selected, reason)             │
//! │       │                                                                 │
//! │       ├── quantity <= 0        ──► rejected report, nothing touched     │
//! │       ├── product not found    ──► rejected report                      │
//! │       ├── !has_ingredients     ──► empty report (no-op)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_requirements ──► [required..., selected optional...]           │
//! │       │                                                                 │
//! │       ▼  one at a time, in order                                        │
//! │  StockDeductor::deduct_one(id, per_unit × quantity, reason, actor)      │
//! │       │                                                                 │
//! │       └── a failed ingredient does not stop the rest                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is rolled back: a preparation can end with some ingredients
//! deducted and others rejected. Callers needing all-or-nothing run
//! `validate_availability` first and treat it as a gate.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kitchen_stock::{IngredientStockService, StockConfig};
//!
//! let service = IngredientStockService::new(Arc::new(db), StockConfig::default());
//! let check = service.validate_availability("burger", 2, Some(vec!["cheese".into()])).await;
//! if check.sufficient {
//!     service.deduct_ingredients("burger", 2, Some(vec!["cheese".into()]), "Order #1042").await;
//! }
//! ```

use std::sync::Arc;

use kitchen_core::resolution::resolve_requirements;
use kitchen_core::validation::validate_preparation_count;
use kitchen_core::{SelectedIngredients, ValidationReport};
use tracing::{debug, info, instrument, warn};

use crate::config::StockConfig;
use crate::deductor::StockDeductor;
use crate::error::StockError;
use crate::events::{StockEvent, StockObserver, TracingObserver};
use crate::locks::IngredientLocks;
use crate::recorder::MovementRecorder;
use crate::report::DeductionReport;
use crate::store::LedgerStore;
use crate::synchronizer::InventorySynchronizer;
use crate::validator::StockValidator;

#[derive(Clone)]
pub struct IngredientStockService {
    store: Arc<dyn LedgerStore>,
    observer: Arc<dyn StockObserver>,
    config: StockConfig,
    deductor: StockDeductor,
    validator: StockValidator,
}

impl IngredientStockService {
    /// Service reporting its events through `tracing`.
    pub fn new(store: Arc<dyn LedgerStore>, config: StockConfig) -> Self {
        Self::with_observer(store, config, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        store: Arc<dyn LedgerStore>,
        config: StockConfig,
        observer: Arc<dyn StockObserver>,
    ) -> Self {
        let locks = Arc::new(IngredientLocks::new(config.lock_ingredients));
        let synchronizer = InventorySynchronizer::new(store.clone(), observer.clone(), &config);
        let recorder = MovementRecorder::new(store.clone(), observer.clone());
        let deductor = StockDeductor::new(
            store.clone(),
            observer.clone(),
            locks,
            synchronizer,
            recorder,
        );
        let validator = StockValidator::new(store.clone());

        IngredientStockService {
            store,
            observer,
            config,
            deductor,
            validator,
        }
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// Single-ingredient deduction, exposed for callers that resolve
    /// recipes themselves.
    pub fn deductor(&self) -> &StockDeductor {
        &self.deductor
    }

    /// Deducts the stock used by preparing `quantity` units of `product_id`.
    ///
    /// `selected` lists the optional ingredient ids the customer picked;
    /// `None` means none. Never fails: the report says what happened.
    #[instrument(skip(self, selected))]
    pub async fn deduct_ingredients(
        &self,
        product_id: &str,
        quantity: i64,
        selected: Option<Vec<String>>,
        reason: &str,
    ) -> DeductionReport {
        let selected = SelectedIngredients::from_option(selected);
        self.deduct_selected(product_id, quantity, &selected, reason, &self.config.actor)
            .await
    }

    /// As `deduct_ingredients`, with an explicit selection and actor.
    pub async fn deduct_selected(
        &self,
        product_id: &str,
        quantity: i64,
        selected: &SelectedIngredients,
        reason: &str,
        actor: &str,
    ) -> DeductionReport {
        let mut report = DeductionReport::new(product_id, quantity);

        if let Err(e) = validate_preparation_count(quantity) {
            let err = StockError::from(e);
            warn!(%product_id, quantity, "Refusing deduction: {}", err);
            return report.refuse(&err);
        }

        let product = match self.store.find_product(product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                let err = StockError::ProductNotFound(product_id.to_string());
                warn!(%product_id, "Refusing deduction: product not found");
                return report.refuse(&err);
            }
            Err(e) => {
                let err = StockError::Store(e);
                warn!(%product_id, error = %err, "Refusing deduction: product lookup failed");
                return report.refuse(&err);
            }
        };
        report.product_name = Some(product.name.clone());

        if !product.has_ingredients {
            debug!(%product_id, "Product has no ingredients, nothing to deduct");
            report.no_ingredients = true;
            return report;
        }

        let plan = match resolve_requirements(&product, quantity, selected) {
            Ok(plan) => plan,
            Err(e) => return report.refuse(&StockError::from(e)),
        };

        for link in &plan.skipped_optional {
            self.observer.on_event(&StockEvent::OptionalSkipped {
                product_id: product.id.clone(),
                ingredient_id: link.ingredient_id.clone(),
                name: link.name.clone(),
            });
            report.skipped_optional.push(link.ingredient_id.clone());
        }

        for requirement in &plan.requirements {
            let outcome = self
                .deductor
                .deduct_one(
                    &requirement.ingredient_id,
                    requirement.quantity_needed,
                    &requirement.reason(reason),
                    actor,
                )
                .await;

            if !outcome.is_success() {
                warn!(
                    %product_id,
                    ingredient_id = %requirement.ingredient_id,
                    status = ?outcome.status,
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "Ingredient not deducted, continuing with the rest"
                );
            }
            report.outcomes.push(outcome);
        }

        info!(
            %product_id,
            quantity,
            deducted = report.deducted_count(),
            failed = report.failures().count(),
            "Preparation deduction finished"
        );

        report
    }

    /// Read-only check that `quantity` units of `product_id` can be prepared.
    pub async fn validate_availability(
        &self,
        product_id: &str,
        quantity: i64,
        selected: Option<Vec<String>>,
    ) -> ValidationReport {
        let selected = SelectedIngredients::from_option(selected);
        self.validator
            .check_availability(product_id, quantity, &selected)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::memory::InMemoryLedger;
    use crate::report::OutcomeStatus;
    use kitchen_core::{Ingredient, IngredientLink, MovementKind, Product, ProductKind};

    fn ingredient(id: &str, name: &str, stock: f64, minimum: f64) -> Ingredient {
        let mut ingredient = Ingredient::new(name, "g", stock, minimum);
        ingredient.id = id.to_string();
        ingredient
    }

    async fn kitchen(config: StockConfig) -> (Arc<InMemoryLedger>, Arc<RecordingObserver>, IngredientStockService) {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.put_ingredient(ingredient("bun", "Bun", 100.0, 10.0)).await;
        ledger.put_ingredient(ingredient("patty", "Patty", 1500.0, 300.0)).await;
        ledger.put_ingredient(ingredient("cheese", "Cheese", 10.0, 2.0)).await;
        ledger.put_ingredient(ingredient("bacon", "Bacon", 50.0, 5.0)).await;
        let mut salt = ingredient("salt", "Salt", 1000.0, 0.0);
        salt.deductible = false;
        ledger.put_ingredient(salt).await;

        ledger
            .put_product(Product {
                id: "burger".into(),
                name: "Burger".into(),
                kind: ProductKind::Individual,
                has_ingredients: true,
                required_ingredients: vec![
                    IngredientLink::new("bun", 1.0, "Bun", "unit"),
                    IngredientLink::new("patty", 150.0, "Patty", "g"),
                    IngredientLink::new("salt", 2.0, "Salt", "g"),
                ],
                optional_ingredients: vec![
                    IngredientLink::new("cheese", 3.0, "Cheese", "g"),
                    IngredientLink::new("bacon", 2.0, "Bacon", "slice"),
                ],
            })
            .await;
        ledger
            .put_product(Product {
                id: "soda".into(),
                name: "Soda".into(),
                kind: ProductKind::Individual,
                has_ingredients: false,
                required_ingredients: vec![],
                optional_ingredients: vec![IngredientLink::new("cheese", 1.0, "Cheese", "g")],
            })
            .await;

        let observer = RecordingObserver::new();
        let service = IngredientStockService::with_observer(ledger.clone(), config, observer.clone());
        (ledger, observer, service)
    }

    async fn stock_of(ledger: &InMemoryLedger, id: &str) -> f64 {
        ledger.find_ingredient(id).await.unwrap().unwrap().current_stock
    }

    #[tokio::test]
    async fn test_required_and_selected_optional_are_deducted() {
        let (ledger, observer, service) = kitchen(StockConfig::default()).await;

        let report = service
            .deduct_ingredients("burger", 2, Some(vec!["cheese".into()]), "Order #7")
            .await;

        assert!(report.is_complete());
        assert_eq!(report.product_name.as_deref(), Some("Burger"));
        assert_eq!(report.deducted_count(), 3);
        assert_eq!(report.skipped_optional, vec!["bacon".to_string()]);

        assert_eq!(stock_of(&ledger, "bun").await, 98.0);
        assert_eq!(stock_of(&ledger, "patty").await, 1200.0);
        assert_eq!(stock_of(&ledger, "cheese").await, 4.0);
        assert_eq!(stock_of(&ledger, "bacon").await, 50.0);
        assert_eq!(stock_of(&ledger, "salt").await, 1000.0);

        let cheese_trail = ledger.movements_for_ingredient("cheese").await.unwrap();
        assert_eq!(cheese_trail[0].reason, "Order #7 - optional ingredient: Cheese");
        assert_eq!(cheese_trail[0].responsible, "System");
        let bun_trail = ledger.movements_for_ingredient("bun").await.unwrap();
        assert_eq!(bun_trail[0].reason, "Order #7 - required ingredient: Bun");

        assert!(observer
            .events()
            .iter()
            .any(|e| matches!(e, StockEvent::OptionalSkipped { ingredient_id, .. } if ingredient_id == "bacon")));
    }

    #[tokio::test]
    async fn test_selection_is_set_membership() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;

        service
            .deduct_ingredients(
                "burger",
                1,
                Some(vec!["bacon".into(), "cheese".into(), "bacon".into(), "unknown".into()]),
                "Order",
            )
            .await;

        assert_eq!(stock_of(&ledger, "cheese").await, 7.0);
        assert_eq!(stock_of(&ledger, "bacon").await, 48.0);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_rest() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;

        // cheese needs 12, has 10
        let report = service
            .deduct_ingredients("burger", 4, Some(vec!["cheese".into(), "bacon".into()]), "Order")
            .await;

        assert!(!report.rejected);
        assert!(!report.is_complete());
        assert_eq!(report.outcome("cheese").map(|o| o.status), Some(OutcomeStatus::Rejected));
        assert_eq!(report.outcome("bacon").map(|o| o.status), Some(OutcomeStatus::Deducted));

        assert_eq!(stock_of(&ledger, "cheese").await, 10.0);
        assert_eq!(stock_of(&ledger, "bacon").await, 42.0);
        assert_eq!(stock_of(&ledger, "bun").await, 96.0);

        let cheese_trail = ledger.movements_for_ingredient("cheese").await.unwrap();
        assert_eq!(cheese_trail.len(), 1);
        assert_eq!(cheese_trail[0].kind, MovementKind::Error);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_a_no_op() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;

        for quantity in [0, -2] {
            let report = service
                .deduct_ingredients("burger", quantity, Some(vec!["cheese".into()]), "Order")
                .await;
            assert!(report.rejected);
            assert!(report.outcomes.is_empty());
        }

        assert_eq!(stock_of(&ledger, "bun").await, 100.0);
        assert!(ledger.all_movements().await.is_empty());
        assert_eq!(ledger.mirror_count().await, 0);
    }

    #[tokio::test]
    async fn test_product_without_ingredients_is_a_no_op() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;

        let report = service
            .deduct_ingredients("soda", 3, Some(vec!["cheese".into()]), "Order")
            .await;

        assert!(report.no_ingredients);
        assert!(report.is_complete());
        assert!(report.outcomes.is_empty());
        assert_eq!(stock_of(&ledger, "cheese").await, 10.0);
        assert!(ledger.all_movements().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_refused() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;

        let report = service.deduct_ingredients("ghost", 1, None, "Order").await;

        assert!(report.rejected);
        assert_eq!(report.error.as_deref(), Some("Product not found: ghost"));
        assert!(ledger.all_movements().await.is_empty());
    }

    #[tokio::test]
    async fn test_product_lookup_failure_is_reported_in_band() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;
        ledger.fail_product_reads(true);

        let report = service
            .deduct_ingredients("burger", 1, Some(vec!["cheese".into()]), "Order")
            .await;
        assert!(report.rejected);
        assert!(report.outcomes.is_empty());
        assert_eq!(
            report.error.as_deref(),
            Some("Ledger store error: Ledger unavailable: ledger offline")
        );

        let check = service.validate_availability("burger", 1, None).await;
        assert!(!check.sufficient);
        assert!(check.error.unwrap().contains("Ledger unavailable"));

        ledger.fail_product_reads(false);
        assert_eq!(stock_of(&ledger, "bun").await, 100.0);
        assert!(ledger.all_movements().await.is_empty());
    }

    #[tokio::test]
    async fn test_configured_actor_is_recorded() {
        let config = StockConfig {
            actor: "Line 2".into(),
            ..StockConfig::default()
        };
        let (ledger, _, service) = kitchen(config).await;

        service.deduct_ingredients("burger", 1, None, "Order").await;

        let trail = ledger.movements_for_ingredient("bun").await.unwrap();
        assert_eq!(trail[0].responsible, "Line 2");
    }

    #[tokio::test]
    async fn test_validation_gate_matches_deduction() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;
        let selected = Some(vec!["cheese".to_string()]);

        let check = service.validate_availability("burger", 4, selected.clone()).await;
        assert!(!check.sufficient);
        assert_eq!(check.shortfalls[0].ingredient_id, "cheese");
        assert!(ledger.all_movements().await.is_empty());

        let check = service.validate_availability("burger", 3, selected.clone()).await;
        assert!(check.sufficient);
        assert_eq!(check.warnings.len(), 1);

        let report = service.deduct_ingredients("burger", 3, selected, "Order").await;
        assert!(report.is_complete());
        assert_eq!(stock_of(&ledger, "cheese").await, 1.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_preparations_cannot_overdraw() {
        let (ledger, _, service) = kitchen(StockConfig::default()).await;

        // Each order takes 6 of 10 cheese: only one can succeed.
        let mut handles = Vec::new();
        for order in 0..2 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .deduct_ingredients("burger", 2, Some(vec!["cheese".into()]), &format!("Order {}", order))
                    .await
            }));
        }

        let mut deducted = 0;
        for handle in handles {
            let report = handle.await.unwrap();
            if report.outcome("cheese").map(|o| o.status) == Some(OutcomeStatus::Deducted) {
                deducted += 1;
            }
        }

        assert_eq!(deducted, 1);
        assert_eq!(stock_of(&ledger, "cheese").await, 4.0);
        let trail = ledger.movements_for_ingredient("cheese").await.unwrap();
        assert_eq!(trail.len(), 2);
    }
}
