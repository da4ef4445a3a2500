//! # Inventory Synchronizer
//!
//! Keeps the inventory mirror of an ingredient equal to its stock.
//!
//! ## Sync Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sync(ingredient_id, new_stock)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_mirror(ingredient_id)                                             │
//! │       │                                                                 │
//! │       ├── Some(mirror) ─► |mirror - new_stock| > tolerance ? drift event│
//! │       │                   overwrite quantity + last_updated             │
//! │       │                                                                 │
//! │       └── None ─► re-read ingredient (name / unit / minimum)            │
//! │                   create mirror: category, status, unit cost 0          │
//! │                                                                         │
//! │  Any store error ─► SyncFailed event + Err(SyncFailure)                 │
//! │  The ingredient write that triggered the sync is never undone.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use kitchen_core::InventoryMirror;

use crate::config::StockConfig;
use crate::error::{StockError, StockResult};
use crate::events::{StockEvent, StockObserver};
use crate::store::LedgerStore;

/// What a successful sync did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    Created,
    /// Existing mirror overwritten; `drifted` when it disagreed beyond tolerance.
    Updated { drifted: bool },
}

#[derive(Clone)]
pub struct InventorySynchronizer {
    store: Arc<dyn LedgerStore>,
    observer: Arc<dyn StockObserver>,
    tolerance: f64,
    category: String,
    status: String,
}

impl InventorySynchronizer {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        observer: Arc<dyn StockObserver>,
        config: &StockConfig,
    ) -> Self {
        InventorySynchronizer {
            store,
            observer,
            tolerance: config.sync_tolerance,
            category: config.mirror_category.clone(),
            status: config.mirror_status.clone(),
        }
    }

    /// Brings the mirror of `ingredient_id` to `new_stock`.
    pub async fn sync(&self, ingredient_id: &str, new_stock: f64) -> StockResult<SyncOutcome> {
        match self.try_sync(ingredient_id, new_stock).await {
            Ok(outcome) => Ok(outcome),
            Err(reason) => {
                self.observer.on_event(&StockEvent::SyncFailed {
                    ingredient_id: ingredient_id.to_string(),
                    reason: reason.clone(),
                });
                Err(StockError::SyncFailure {
                    ingredient_id: ingredient_id.to_string(),
                    reason,
                })
            }
        }
    }

    async fn try_sync(&self, ingredient_id: &str, new_stock: f64) -> Result<SyncOutcome, String> {
        let existing = self
            .store
            .find_mirror(ingredient_id)
            .await
            .map_err(|e| e.to_string())?;

        match existing {
            Some(mut mirror) => {
                let drifted = mirror.drift_from(new_stock) > self.tolerance;
                if drifted {
                    self.observer.on_event(&StockEvent::MirrorDrift {
                        ingredient_id: ingredient_id.to_string(),
                        mirrored: mirror.current_quantity,
                        actual: new_stock,
                    });
                }

                mirror.current_quantity = new_stock;
                mirror.last_updated = Utc::now();
                self.store
                    .save_mirror(&mirror)
                    .await
                    .map_err(|e| e.to_string())?;

                Ok(SyncOutcome::Updated { drifted })
            }
            None => {
                let ingredient = self
                    .store
                    .find_ingredient(ingredient_id)
                    .await
                    .map_err(|e| e.to_string())?
                    .ok_or_else(|| format!("ingredient {} no longer exists", ingredient_id))?;

                let mut mirror = InventoryMirror::for_ingredient(&ingredient, new_stock);
                mirror.category = self.category.clone();
                mirror.status = self.status.clone();
                self.store
                    .save_mirror(&mirror)
                    .await
                    .map_err(|e| e.to_string())?;

                self.observer.on_event(&StockEvent::MirrorCreated {
                    ingredient_id: ingredient_id.to_string(),
                    quantity: new_stock,
                });
                Ok(SyncOutcome::Created)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::memory::InMemoryLedger;
    use kitchen_core::Ingredient;

    fn setup() -> (Arc<InMemoryLedger>, Arc<RecordingObserver>, InventorySynchronizer) {
        let ledger = Arc::new(InMemoryLedger::new());
        let observer = RecordingObserver::new();
        let sync = InventorySynchronizer::new(ledger.clone(), observer.clone(), &StockConfig::default());
        (ledger, observer, sync)
    }

    #[tokio::test]
    async fn test_creates_missing_mirror() {
        let (ledger, observer, sync) = setup();
        let cheese = Ingredient::new("Cheese", "g", 7.0, 2.0);
        ledger.put_ingredient(cheese.clone()).await;

        assert_eq!(sync.sync(&cheese.id, 7.0).await.unwrap(), SyncOutcome::Created);

        let mirror = ledger.find_mirror(&cheese.id).await.unwrap().unwrap();
        assert_eq!(mirror.product_id, cheese.id);
        assert_eq!(mirror.current_quantity, 7.0);
        assert_eq!(mirror.minimum_quantity, 2.0);
        assert_eq!(mirror.category, "ingredient");
        assert_eq!(mirror.status, "active");
        assert_eq!(mirror.unit_cost_cents, 0);
        assert!(matches!(observer.events()[0], StockEvent::MirrorCreated { .. }));
    }

    #[tokio::test]
    async fn test_overwrites_and_flags_drift() {
        let (ledger, observer, sync) = setup();
        let cheese = Ingredient::new("Cheese", "g", 10.0, 2.0);
        let mut stale = InventoryMirror::for_ingredient(&cheese, 12.0);
        stale.unit_cost_cents = 450;
        ledger.put_mirror(stale.clone()).await;

        let outcome = sync.sync(&cheese.id, 7.0).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Updated { drifted: true });

        let mirror = ledger.find_mirror(&cheese.id).await.unwrap().unwrap();
        assert_eq!(mirror.id, stale.id);
        assert_eq!(mirror.current_quantity, 7.0);
        assert_eq!(mirror.unit_cost_cents, 450);
        assert!(observer
            .events()
            .iter()
            .any(|e| matches!(e, StockEvent::MirrorDrift { mirrored, .. } if *mirrored == 12.0)));
    }

    #[tokio::test]
    async fn test_difference_within_tolerance_is_not_drift() {
        let (ledger, observer, sync) = setup();
        let cheese = Ingredient::new("Cheese", "g", 10.0, 2.0);
        ledger
            .put_mirror(InventoryMirror::for_ingredient(&cheese, 7.00001))
            .await;

        let outcome = sync.sync(&cheese.id, 7.0).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Updated { drifted: false });
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_vanished_ingredient_is_sync_failure() {
        let (ledger, observer, sync) = setup();

        let err = sync.sync("ghost", 1.0).await.unwrap_err();
        assert!(matches!(err, StockError::SyncFailure { .. }));
        assert_eq!(ledger.mirror_count().await, 0);
        assert!(matches!(observer.events()[0], StockEvent::SyncFailed { .. }));
    }

    #[tokio::test]
    async fn test_write_failure_is_sync_failure() {
        let (ledger, _observer, sync) = setup();
        let cheese = Ingredient::new("Cheese", "g", 10.0, 2.0);
        ledger.put_ingredient(cheese.clone()).await;
        ledger.fail_mirror_writes(true);

        assert!(matches!(
            sync.sync(&cheese.id, 7.0).await,
            Err(StockError::SyncFailure { .. })
        ));
    }
}
