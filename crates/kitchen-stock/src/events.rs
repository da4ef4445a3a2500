//! # Stock Events
//!
//! Typed observability signals emitted by the stock workflow.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Deductor / Synchronizer / Recorder / Service                           │
//! │       │  StockEvent                                                     │
//! │       ▼                                                                 │
//! │  Arc<dyn StockObserver>                                                 │
//! │       ├── TracingObserver    → tracing (debug / info / warn / error)    │
//! │       └── RecordingObserver  → Vec<StockEvent> (tests, diagnostics)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are side information. Nothing in the workflow branches on whether
//! an observer saw them.

use std::sync::{Arc, Mutex};

use kitchen_core::LowStockWarning;
use tracing::{debug, error, info, warn};

/// Something worth knowing that happened during a deduction or sync.
#[derive(Debug, Clone, PartialEq)]
pub enum StockEvent {
    Deducted {
        ingredient_id: String,
        quantity: f64,
        before: f64,
        after: f64,
    },

    /// Ingredient is flagged non-deductible; stock untouched.
    SkippedNonDeductible { ingredient_id: String, name: String },

    RejectedShortfall {
        ingredient_id: String,
        name: String,
        available: f64,
        requested: f64,
    },

    /// Stock ended at or below its minimum after a successful deduction.
    LowStock(LowStockWarning),

    MirrorCreated { ingredient_id: String, quantity: f64 },

    /// The mirror disagreed with the ingredient before being overwritten.
    MirrorDrift {
        ingredient_id: String,
        mirrored: f64,
        actual: f64,
    },

    SyncFailed { ingredient_id: String, reason: String },

    LogFailed { ingredient_id: String, reason: String },

    OptionalSkipped {
        product_id: String,
        ingredient_id: String,
        name: String,
    },
}

impl StockEvent {
    /// Ingredient the event concerns.
    pub fn ingredient_id(&self) -> &str {
        match self {
            StockEvent::Deducted { ingredient_id, .. }
            | StockEvent::SkippedNonDeductible { ingredient_id, .. }
            | StockEvent::RejectedShortfall { ingredient_id, .. }
            | StockEvent::MirrorCreated { ingredient_id, .. }
            | StockEvent::MirrorDrift { ingredient_id, .. }
            | StockEvent::SyncFailed { ingredient_id, .. }
            | StockEvent::LogFailed { ingredient_id, .. }
            | StockEvent::OptionalSkipped { ingredient_id, .. } => ingredient_id,
            StockEvent::LowStock(warning) => &warning.ingredient_id,
        }
    }
}

/// Receives stock events. Implementations must not block.
pub trait StockObserver: Send + Sync {
    fn on_event(&self, event: &StockEvent);
}

// =============================================================================
// Tracing Observer
// =============================================================================

/// Default observer: forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StockObserver for TracingObserver {
    fn on_event(&self, event: &StockEvent) {
        match event {
            StockEvent::Deducted {
                ingredient_id,
                quantity,
                before,
                after,
            } => {
                info!(%ingredient_id, quantity, before, after, "Ingredient stock deducted");
            }
            StockEvent::SkippedNonDeductible { ingredient_id, name } => {
                info!(%ingredient_id, %name, "Ingredient not deductible, stock left as-is");
            }
            StockEvent::RejectedShortfall {
                ingredient_id,
                name,
                available,
                requested,
            } => {
                warn!(
                    %ingredient_id,
                    %name,
                    available,
                    requested,
                    "Insufficient stock, deduction rejected"
                );
            }
            StockEvent::LowStock(w) => {
                warn!(
                    ingredient_id = %w.ingredient_id,
                    name = %w.name,
                    stock = w.stock_after,
                    minimum = w.minimum_stock,
                    unit = %w.unit,
                    "Ingredient stock at or below minimum"
                );
            }
            StockEvent::MirrorCreated {
                ingredient_id,
                quantity,
            } => {
                info!(%ingredient_id, quantity, "Inventory mirror created");
            }
            StockEvent::MirrorDrift {
                ingredient_id,
                mirrored,
                actual,
            } => {
                info!(%ingredient_id, mirrored, actual, "Inventory mirror out of step, overwriting");
            }
            StockEvent::SyncFailed {
                ingredient_id,
                reason,
            } => {
                error!(%ingredient_id, %reason, "Inventory mirror sync failed");
            }
            StockEvent::LogFailed {
                ingredient_id,
                reason,
            } => {
                error!(%ingredient_id, %reason, "Stock movement could not be recorded");
            }
            StockEvent::OptionalSkipped {
                product_id,
                ingredient_id,
                name,
            } => {
                debug!(%product_id, %ingredient_id, %name, "Optional ingredient not selected");
            }
        }
    }
}

// =============================================================================
// Recording Observer
// =============================================================================

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StockEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<StockEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn low_stock_warnings(&self) -> Vec<LowStockWarning> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StockEvent::LowStock(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl StockObserver for RecordingObserver {
    fn on_event(&self, event: &StockEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Fans one event out to several observers.
pub struct FanOut(pub Vec<Arc<dyn StockObserver>>);

impl StockObserver for FanOut {
    fn on_event(&self, event: &StockEvent) {
        for observer in &self.0 {
            observer.on_event(event);
        }
    }
}
