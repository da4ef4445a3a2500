//! # Domain Types
//!
//! Records the stock workflow reads and writes.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1   *  ┌─────────────────┐  *   1  ┌──────────┐ │
//! │  │    Product      │─────────│ IngredientLink  │─────────│Ingredient│ │
//! │  │  has_ingredients│         │ qty per unit    │         │ stock    │ │
//! │  │  required[]     │         │ name / unit     │         │ minimum  │ │
//! │  │  optional[]     │         └─────────────────┘         │deductible│ │
//! │  └─────────────────┘                                     └────┬─────┘ │
//! │                                              1 ┌──────────────┤       │
//! │                                                │              │ 1     │
//! │                                     1 ┌────────▼────────┐  *  │       │
//! │                                       │ InventoryMirror │  ┌──▼─────┐ │
//! │                                       │ (lazy, synced)  │  │Movement│ │
//! │                                       └─────────────────┘  │  log   │ │
//! │                                                            └────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock quantities are `f64`: recipes use fractional grams and litres, and a
//! deduction is never rounded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{MIRROR_CATEGORY, MIRROR_STATUS_ACTIVE, OUTFLOW_NOTES};

// =============================================================================
// Ingredient
// =============================================================================

/// A stocked ingredient.
///
/// Only the stock deductor mutates `current_stock`, and only by saving the
/// whole record back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: String,
    pub name: String,

    /// Unit of measure ("g", "ml", "unit", ...).
    pub unit: String,

    /// Current stock level. Never driven negative by a deduction.
    pub current_stock: f64,

    /// Threshold at or below which stock counts as low.
    pub minimum_stock: f64,

    /// When false, automated preparation never decrements this ingredient.
    pub deductible: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Creates a deductible ingredient with a fresh id.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        current_stock: f64,
        minimum_stock: f64,
    ) -> Self {
        let now = Utc::now();
        Ingredient {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            unit: unit.into(),
            current_stock,
            minimum_stock,
            deductible: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks if current stock covers `quantity`.
    #[inline]
    pub fn can_cover(&self, quantity: f64) -> bool {
        self.current_stock >= quantity
    }

    /// Stock left after taking `quantity` (may go below the minimum).
    #[inline]
    pub fn stock_after(&self, quantity: f64) -> f64 {
        self.current_stock - quantity
    }

    /// Checks if `stock` sits at or below this ingredient's minimum.
    #[inline]
    pub fn is_low(&self, stock: f64) -> bool {
        stock <= self.minimum_stock
    }
}

// =============================================================================
// Product
// =============================================================================

/// What a product is on the menu.
///
/// Informational only: resolution looks at `has_ingredients` and the
/// association lists, never at the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Single menu item (burger, coffee).
    #[default]
    Individual,
    /// Bundle of items sold together.
    Combo,
    /// An ingredient that is also sold on its own.
    Ingredient,
}

/// Association between a product and one of its ingredients.
///
/// Name and unit are denormalized copies kept for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLink {
    pub ingredient_id: String,
    /// Amount of the ingredient used per prepared unit.
    pub quantity_per_unit: f64,
    pub name: String,
    pub unit: String,
}

impl IngredientLink {
    pub fn new(
        ingredient_id: impl Into<String>,
        quantity_per_unit: f64,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        IngredientLink {
            ingredient_id: ingredient_id.into(),
            quantity_per_unit,
            name: name.into(),
            unit: unit.into(),
        }
    }
}

/// A sellable product. Read-only for the stock workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub kind: ProductKind,

    /// False means "nothing to deduct", regardless of the lists below.
    pub has_ingredients: bool,

    /// Always deducted, in order.
    pub required_ingredients: Vec<IngredientLink>,

    /// Deducted only when the customer selects them.
    pub optional_ingredients: Vec<IngredientLink>,
}

/// Whether an association is required or optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LinkRole {
    Required,
    Optional,
}

impl std::fmt::Display for LinkRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkRole::Required => write!(f, "required"),
            LinkRole::Optional => write!(f, "optional"),
        }
    }
}

// =============================================================================
// Inventory Mirror
// =============================================================================

/// Secondary inventory record tracking an ingredient's stock.
///
/// `product_id` holds the *ingredient* id: the inventory table shares one id
/// space between sellable products and ingredients. Only the inventory
/// synchronizer writes these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryMirror {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub current_quantity: f64,
    pub minimum_quantity: f64,
    pub unit: String,
    /// Unit cost in cents. Mirrors created by the synchronizer start at zero.
    pub unit_cost_cents: i64,
    pub last_updated: DateTime<Utc>,
    pub status: String,
}

impl InventoryMirror {
    /// Builds the first mirror record for `ingredient` at `stock`.
    pub fn for_ingredient(ingredient: &Ingredient, stock: f64) -> Self {
        InventoryMirror {
            id: Uuid::new_v4().to_string(),
            product_id: ingredient.id.clone(),
            product_name: ingredient.name.clone(),
            category: MIRROR_CATEGORY.to_string(),
            current_quantity: stock,
            minimum_quantity: ingredient.minimum_stock,
            unit: ingredient.unit.clone(),
            unit_cost_cents: 0,
            last_updated: Utc::now(),
            status: MIRROR_STATUS_ACTIVE.to_string(),
        }
    }

    /// Absolute difference between the mirrored quantity and `stock`.
    #[inline]
    pub fn drift_from(&self, stock: f64) -> f64 {
        (self.current_quantity - stock).abs()
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Kind of movement log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Completed stock decrease.
    Outflow,
    /// Rejected deduction (insufficient stock). Stock unchanged.
    Error,
}

/// Append-only audit entry. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub kind: MovementKind,
    pub reason: String,
    pub quantity_before: f64,
    /// Negative for outflows, zero for errors.
    pub quantity_delta: f64,
    pub quantity_after: f64,
    pub responsible: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Entry for a completed deduction of `quantity` from `before`.
    pub fn outflow(
        ingredient: &Ingredient,
        quantity: f64,
        before: f64,
        after: f64,
        reason: &str,
        actor: &str,
    ) -> Self {
        StockMovement {
            id: Uuid::new_v4().to_string(),
            ingredient_id: ingredient.id.clone(),
            ingredient_name: ingredient.name.clone(),
            kind: MovementKind::Outflow,
            reason: reason.to_string(),
            quantity_before: before,
            quantity_delta: -quantity,
            quantity_after: after,
            responsible: actor.to_string(),
            notes: OUTFLOW_NOTES.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Entry for a deduction of `required` that stock could not cover.
    ///
    /// Before and after both equal the untouched stock; the delta is zero.
    pub fn rejected(ingredient: &Ingredient, required: f64, reason: &str, actor: &str) -> Self {
        let available = ingredient.current_stock;
        StockMovement {
            id: Uuid::new_v4().to_string(),
            ingredient_id: ingredient.id.clone(),
            ingredient_name: ingredient.name.clone(),
            kind: MovementKind::Error,
            reason: format!("ERROR: {} - insufficient stock", reason),
            quantity_before: available,
            quantity_delta: 0.0,
            quantity_after: available,
            responsible: actor.to_string(),
            notes: format!(
                "Failed attempt - required: {}, available: {}",
                required, available
            ),
            created_at: Utc::now(),
        }
    }
}
