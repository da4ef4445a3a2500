//! # Repository Module
//!
//! Repositories for the kitchen ledger tables.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  IngredientRepository  ingredients          get / insert / update      │
//! │  ProductRepository     products +           get (with ordered links)   │
//! │                        product_ingredients  insert                     │
//! │  InventoryRepository   inventory            get by ingredient / upsert │
//! │  MovementRepository    stock_movements      append / list (no update!) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All queries are built at runtime with `sqlx::query`/`query_as`, so the
//! crate builds without a prepared database.

pub mod ingredient;
pub mod inventory;
pub mod movement;
pub mod product;
