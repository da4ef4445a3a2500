//! # Stock Deductor
//!
//! Decrements one ingredient.
//!
//! ## Per-Ingredient Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  deduct_one(ingredient_id, quantity, reason, actor)                     │
//! │                                                                         │
//! │  quantity <= 0 / NaN ?      ──► Failed  (nothing read, nothing written) │
//! │       │                                                                 │
//! │  [acquire ingredient lock]                                              │
//! │       │                                                                 │
//! │  ingredient missing ?       ──► Failed                                  │
//! │       │                                                                 │
//! │  !deductible ?              ──► NotDeductible (success, no movement)    │
//! │       │                                                                 │
//! │  stock < quantity ?         ──► error movement ──► Rejected             │
//! │       │                                                                 │
//! │  save stock - quantity      ──► store error ──► Failed                  │
//! │       │                                                                 │
//! │  sync mirror    (best effort, failure noted on the outcome)             │
//! │  outflow movement (best effort, failure noted on the outcome)           │
//! │  after <= minimum ? ──► LowStock event                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Deducted                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is never driven negative and a deduction is never partial: either
//! the whole quantity comes off or none of it does.

use std::sync::Arc;

use chrono::Utc;
use kitchen_core::validation::validate_deduction_quantity;
use kitchen_core::{Ingredient, LowStockWarning};
use tracing::debug;

use crate::error::StockError;
use crate::events::{StockEvent, StockObserver};
use crate::locks::IngredientLocks;
use crate::recorder::MovementRecorder;
use crate::report::{IngredientOutcome, OutcomeStatus};
use crate::store::LedgerStore;
use crate::synchronizer::InventorySynchronizer;

#[derive(Clone)]
pub struct StockDeductor {
    store: Arc<dyn LedgerStore>,
    observer: Arc<dyn StockObserver>,
    locks: Arc<IngredientLocks>,
    synchronizer: InventorySynchronizer,
    recorder: MovementRecorder,
}

impl StockDeductor {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        observer: Arc<dyn StockObserver>,
        locks: Arc<IngredientLocks>,
        synchronizer: InventorySynchronizer,
        recorder: MovementRecorder,
    ) -> Self {
        StockDeductor {
            store,
            observer,
            locks,
            synchronizer,
            recorder,
        }
    }

    /// Deducts `quantity` of one ingredient. Never returns an error; the
    /// outcome says what happened.
    pub async fn deduct_one(
        &self,
        ingredient_id: &str,
        quantity: f64,
        reason: &str,
        actor: &str,
    ) -> IngredientOutcome {
        let outcome = IngredientOutcome::new(ingredient_id, quantity);

        if let Err(e) = validate_deduction_quantity(quantity) {
            return outcome.fail(OutcomeStatus::Failed, &StockError::from(e));
        }

        let _guard = self.locks.acquire(ingredient_id).await;

        let ingredient = match self.store.find_ingredient(ingredient_id).await {
            Ok(Some(ingredient)) => ingredient,
            Ok(None) => {
                let err = StockError::IngredientNotFound(ingredient_id.to_string());
                debug!(%ingredient_id, "Ingredient not found, skipping deduction");
                return outcome.fail(OutcomeStatus::Failed, &err);
            }
            Err(e) => return outcome.fail(OutcomeStatus::Failed, &StockError::Store(e)),
        };

        self.apply(outcome, ingredient, quantity, reason, actor).await
    }

    async fn apply(
        &self,
        mut outcome: IngredientOutcome,
        ingredient: Ingredient,
        quantity: f64,
        reason: &str,
        actor: &str,
    ) -> IngredientOutcome {
        let before = ingredient.current_stock;
        outcome.name = ingredient.name.clone();
        outcome.stock_before = Some(before);

        if !ingredient.deductible {
            self.observer.on_event(&StockEvent::SkippedNonDeductible {
                ingredient_id: ingredient.id.clone(),
                name: ingredient.name.clone(),
            });
            outcome.status = OutcomeStatus::NotDeductible;
            outcome.stock_after = Some(before);
            return outcome;
        }

        if !ingredient.can_cover(quantity) {
            self.observer.on_event(&StockEvent::RejectedShortfall {
                ingredient_id: ingredient.id.clone(),
                name: ingredient.name.clone(),
                available: before,
                requested: quantity,
            });
            outcome.stock_after = Some(before);
            if let Err(e) = self
                .recorder
                .record_rejection(&ingredient, quantity, reason, actor)
                .await
            {
                outcome.log_error = Some(e.to_string());
            }
            let err = StockError::InsufficientStock {
                ingredient_id: ingredient.id.clone(),
                name: ingredient.name.clone(),
                available: before,
                requested: quantity,
            };
            return outcome.fail(OutcomeStatus::Rejected, &err);
        }

        let after = ingredient.stock_after(quantity);
        let mut updated = ingredient.clone();
        updated.current_stock = after;
        updated.updated_at = Utc::now();

        if let Err(e) = self.store.save_ingredient(&updated).await {
            return outcome.fail(OutcomeStatus::Failed, &StockError::Store(e));
        }

        outcome.status = OutcomeStatus::Deducted;
        outcome.stock_after = Some(after);
        self.observer.on_event(&StockEvent::Deducted {
            ingredient_id: ingredient.id.clone(),
            quantity,
            before,
            after,
        });

        if let Err(e) = self.synchronizer.sync(&ingredient.id, after).await {
            outcome.sync_error = Some(e.to_string());
        }

        if let Err(e) = self
            .recorder
            .record_outflow(&ingredient, quantity, before, after, reason, actor)
            .await
        {
            outcome.log_error = Some(e.to_string());
        }

        if ingredient.is_low(after) {
            let warning = LowStockWarning {
                ingredient_id: ingredient.id.clone(),
                name: ingredient.name.clone(),
                current_stock: before,
                minimum_stock: ingredient.minimum_stock,
                stock_after: after,
                unit: ingredient.unit.clone(),
            };
            self.observer.on_event(&StockEvent::LowStock(warning.clone()));
            outcome.low_stock = Some(warning);
        }

        outcome
    }
}
