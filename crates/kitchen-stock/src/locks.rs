//! # Per-Ingredient Locks
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request A ── acquire("cheese") ──► read ─ check ─ write ─ sync ─ log  │
//! │  request B ── acquire("cheese") ──► (waits) ───────────────────────────►│
//! │  request C ── acquire("bun")    ──► runs concurrently with A            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locks only serialize deductions going through the same service instance.
//! Writers outside it still race on the ledger.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held for the duration of one ingredient's deduction.
pub type IngredientGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct IngredientLocks {
    enabled: bool,
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl IngredientLocks {
    pub fn new(enabled: bool) -> Self {
        IngredientLocks {
            enabled,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Waits for exclusive access to `ingredient_id`.
    ///
    /// Returns `None` when locking is disabled.
    pub async fn acquire(&self, ingredient_id: &str) -> Option<IngredientGuard> {
        if !self.enabled {
            return None;
        }

        let slot = {
            let mut slots = self.slots.lock().await;
            slots
                .entry(ingredient_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        Some(slot.lock_owned().await)
    }
}
