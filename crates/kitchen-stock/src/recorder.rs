//! # Movement Recorder
//!
//! Writes the audit trail. Every call happens *after* the deduction's outcome
//! is decided, so a failed write is reported and nothing more.

use std::sync::Arc;

use kitchen_core::{Ingredient, StockMovement};

use crate::error::{StockError, StockResult};
use crate::events::{StockEvent, StockObserver};
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct MovementRecorder {
    store: Arc<dyn LedgerStore>,
    observer: Arc<dyn StockObserver>,
}

impl MovementRecorder {
    pub fn new(store: Arc<dyn LedgerStore>, observer: Arc<dyn StockObserver>) -> Self {
        MovementRecorder { store, observer }
    }

    /// Logs a completed deduction of `quantity` (before → after).
    pub async fn record_outflow(
        &self,
        ingredient: &Ingredient,
        quantity: f64,
        before: f64,
        after: f64,
        reason: &str,
        actor: &str,
    ) -> StockResult<StockMovement> {
        let movement = StockMovement::outflow(ingredient, quantity, before, after, reason, actor);
        self.append(movement).await
    }

    /// Logs a deduction of `required` rejected for insufficient stock.
    pub async fn record_rejection(
        &self,
        ingredient: &Ingredient,
        required: f64,
        reason: &str,
        actor: &str,
    ) -> StockResult<StockMovement> {
        let movement = StockMovement::rejected(ingredient, required, reason, actor);
        self.append(movement).await
    }

    async fn append(&self, movement: StockMovement) -> StockResult<StockMovement> {
        match self.store.append_movement(&movement).await {
            Ok(()) => Ok(movement),
            Err(e) => {
                let reason = e.to_string();
                self.observer.on_event(&StockEvent::LogFailed {
                    ingredient_id: movement.ingredient_id.clone(),
                    reason: reason.clone(),
                });
                Err(StockError::LogFailure {
                    ingredient_id: movement.ingredient_id,
                    reason,
                })
            }
        }
    }
}
