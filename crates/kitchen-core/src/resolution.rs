//! # Ingredient Resolution
//!
//! Decides which ingredients take part in one preparation and how much of
//! each is needed.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_requirements(product, count, selected)                         │
//! │                                                                         │
//! │  count <= 0 ?            → Err(Validation), nothing resolved            │
//! │  !has_ingredients ?      → empty plan (not an error)                    │
//! │                                                                         │
//! │  required[i]             → ALWAYS included, qty = per_unit × count      │
//! │  optional[i] ∈ selected  → included,        qty = per_unit × count      │
//! │  optional[i] ∉ selected  → skipped (reported, never deducted)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Selection is set membership: order and duplicates in the caller's list do
//! not matter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::types::{IngredientLink, LinkRole, Product};
use crate::validation::validate_preparation_count;

// =============================================================================
// Selection
// =============================================================================

/// Optional ingredients the customer picked.
///
/// An absent selection is the empty set, never a fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedIngredients(HashSet<String>);

impl SelectedIngredients {
    /// No optional ingredients selected.
    pub fn none() -> Self {
        SelectedIngredients(HashSet::new())
    }

    /// Selection from any list of ingredient ids.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectedIngredients(ids.into_iter().map(Into::into).collect())
    }

    /// Selection from a possibly missing list; `None` means nothing selected.
    pub fn from_option(ids: Option<Vec<String>>) -> Self {
        ids.map(Self::from_ids).unwrap_or_default()
    }

    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.0.contains(ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectedIngredients {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_ids(iter)
    }
}

// =============================================================================
// Requirement
// =============================================================================

/// One ingredient to deduct for a preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub ingredient_id: String,
    /// Display name copied from the association.
    pub name: String,
    pub unit: String,
    /// per-unit quantity × preparation count
    pub quantity_needed: f64,
    pub role: LinkRole,
}

impl Requirement {
    fn from_link(link: &IngredientLink, count: i64, role: LinkRole) -> Self {
        Requirement {
            ingredient_id: link.ingredient_id.clone(),
            name: link.name.clone(),
            unit: link.unit.clone(),
            quantity_needed: link.quantity_per_unit * count as f64,
            role,
        }
    }

    /// Source label appended to the movement reason,
    /// e.g. `"required ingredient: Cheese"`.
    pub fn source_label(&self) -> String {
        format!("{} ingredient: {}", self.role, self.name)
    }

    /// Full movement reason for this requirement.
    pub fn reason(&self, base: &str) -> String {
        format!("{} - {}", base, self.source_label())
    }
}

/// Result of resolving a preparation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPreparation {
    /// Required entries first (in product order), then selected optionals.
    pub requirements: Vec<Requirement>,
    /// Optional associations left out because they were not selected.
    pub skipped_optional: Vec<IngredientLink>,
}

impl ResolvedPreparation {
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Expands a preparation of `count` units of `product` into requirements.
///
/// ## Errors
/// `CoreError::Validation` when `count <= 0`; nothing is resolved.
pub fn resolve_requirements(
    product: &Product,
    count: i64,
    selected: &SelectedIngredients,
) -> CoreResult<ResolvedPreparation> {
    validate_preparation_count(count)?;

    if !product.has_ingredients {
        return Ok(ResolvedPreparation::default());
    }

    let mut plan = ResolvedPreparation::default();

    plan.requirements.extend(
        product
            .required_ingredients
            .iter()
            .map(|link| Requirement::from_link(link, count, LinkRole::Required)),
    );

    for link in &product.optional_ingredients {
        if selected.contains(&link.ingredient_id) {
            plan.requirements
                .push(Requirement::from_link(link, count, LinkRole::Optional));
        } else {
            plan.skipped_optional.push(link.clone());
        }
    }

    Ok(plan)
}
