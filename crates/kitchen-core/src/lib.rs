//! # kitchen-core: Pure Stock Rules for the Titan Kitchen
//!
//! This crate holds the rules that decide *what* happens to ingredient stock
//! when a product is prepared. It never touches a database; the deduction
//! service in `kitchen-stock` feeds it records and acts on its answers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Titan Kitchen Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                kitchen-stock (service layer)                    │   │
//! │  │   deduct_ingredients, validate_availability                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kitchen-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌──────────────┐  ┌────────┐  │   │
//! │  │   │   types   │  │ resolution │  │ availability │  │ valid- │  │   │
//! │  │   │ Ingredient│  │ required + │  │  shortfall / │  │ ation  │  │   │
//! │  │   │ Product   │  │ selected   │  │  low stock   │  │        │  │   │
//! │  │   └───────────┘  └────────────┘  └──────────────┘  └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kitchen-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ingredient, Product, inventory mirror and movement records
//! - [`resolution`] - Which ingredients participate in a preparation
//! - [`availability`] - Shortfall / low-stock evaluation and reports
//! - [`validation`] - Quantity checks at the API boundary
//! - [`error`] - Validation and resolution errors
//!
//! ## Example Usage
//!
//! ```rust
//! use kitchen_core::resolution::{resolve_requirements, SelectedIngredients};
//! use kitchen_core::{IngredientLink, Product, ProductKind};
//!
//! let burger = Product {
//!     id: "burger".into(),
//!     name: "Burger".into(),
//!     kind: ProductKind::Individual,
//!     has_ingredients: true,
//!     required_ingredients: vec![IngredientLink::new("bun", 1.0, "Bun", "unit")],
//!     optional_ingredients: vec![IngredientLink::new("cheese", 20.0, "Cheese", "g")],
//! };
//!
//! let plan = resolve_requirements(&burger, 2, &SelectedIngredients::none()).unwrap();
//! assert_eq!(plan.requirements.len(), 1);
//! assert_eq!(plan.requirements[0].quantity_needed, 2.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod error;
pub mod resolution;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use availability::{Availability, LowStockWarning, Shortfall, ValidationReport};
pub use error::{CoreError, CoreResult, ValidationError};
pub use resolution::{Requirement, ResolvedPreparation, SelectedIngredients};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Actor written to the movement log for automated deductions.
pub const DEFAULT_ACTOR: &str = "System";

/// Largest difference between a mirror quantity and the ingredient stock that
/// still counts as "in sync".
pub const SYNC_TOLERANCE: f64 = 1e-4;

/// Category stamped on inventory mirror records created for ingredients.
pub const MIRROR_CATEGORY: &str = "ingredient";

/// Status stamped on newly created inventory mirror records.
pub const MIRROR_STATUS_ACTIVE: &str = "active";

/// Notes attached to every successful outflow movement.
pub const OUTFLOW_NOTES: &str = "Automatic inventory deduction";
