//! # kitchen-stock: Ingredient Deduction Service
//!
//! Deducts ingredient stock when products are prepared, checks availability
//! beforehand, keeps the inventory mirror in step and writes the movement
//! audit trail.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POS / kitchen screen                                                   │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │               ★ kitchen-stock (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   IngredientStockService                                        │   │
//! │  │    ├── StockValidator        (read only)                        │   │
//! │  │    └── StockDeductor                                            │   │
//! │  │          ├── IngredientLocks                                    │   │
//! │  │          ├── InventorySynchronizer   (best effort)              │   │
//! │  │          └── MovementRecorder        (best effort)              │   │
//! │  │                                                                 │   │
//! │  │   StockObserver ◄── every StockEvent                            │   │
//! │  └────┬────────────────────────────────────────┬───────────────────┘   │
//! │       │ rules                                  │ LedgerStore            │
//! │  ┌────▼─────────┐                    ┌─────────▼──────────────────┐    │
//! │  │ kitchen-core │                    │ kitchen-db (SQLite)        │    │
//! │  └──────────────┘                    │ InMemoryLedger (tests)     │    │
//! │                                      └────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`service`] - Public operations
//! - [`deductor`] - Single-ingredient deduction
//! - [`validator`] - Availability check
//! - [`synchronizer`] - Inventory mirror sync
//! - [`recorder`] - Movement log writes
//! - [`store`] - Ledger store trait and its SQLite implementation
//! - [`memory`] - In-memory ledger
//! - [`events`] - Observability events and observers
//! - [`locks`] - Per-ingredient mutual exclusion
//! - [`config`] - `StockConfig`
//! - [`report`] - Deduction report types
//! - [`error`] - `StockError`

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod deductor;
pub mod error;
pub mod events;
pub mod locks;
pub mod memory;
pub mod recorder;
pub mod report;
pub mod service;
pub mod store;
pub mod synchronizer;
pub mod validator;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StockConfig;
pub use deductor::StockDeductor;
pub use error::{StockError, StockResult};
pub use events::{FanOut, RecordingObserver, StockEvent, StockObserver, TracingObserver};
pub use locks::IngredientLocks;
pub use memory::InMemoryLedger;
pub use recorder::MovementRecorder;
pub use report::{DeductionReport, IngredientOutcome, OutcomeStatus};
pub use service::IngredientStockService;
pub use store::LedgerStore;
pub use synchronizer::{InventorySynchronizer, SyncOutcome};
pub use validator::StockValidator;

pub use kitchen_core::{LowStockWarning, SelectedIngredients, Shortfall, ValidationReport};
