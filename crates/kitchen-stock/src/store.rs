//! # Ledger Store
//!
//! The narrow storage interface the stock workflow consumes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LedgerStore                                                            │
//! │  ├── find_product(id)                 → Option<Product>                 │
//! │  ├── find_ingredient(id)              → Option<Ingredient>              │
//! │  ├── save_ingredient(&Ingredient)                                       │
//! │  ├── find_mirror(ingredient_id)       → Option<InventoryMirror>         │
//! │  ├── save_mirror(&InventoryMirror)    (insert or overwrite)             │
//! │  ├── append_movement(&StockMovement)  (append only)                     │
//! │  └── movements_for_ingredient(id)     → Vec<StockMovement>, oldest first│
//! │                                                                         │
//! │  impl for kitchen_db::Database   (SQLite)                               │
//! │  impl for InMemoryLedger         (tests, see `memory`)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use kitchen_core::{Ingredient, InventoryMirror, Product, StockMovement};
use kitchen_db::{Database, DbResult};

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn find_product(&self, id: &str) -> DbResult<Option<Product>>;

    async fn find_ingredient(&self, id: &str) -> DbResult<Option<Ingredient>>;

    /// Persists the ingredient, including its new stock.
    async fn save_ingredient(&self, ingredient: &Ingredient) -> DbResult<()>;

    /// Mirror record keyed by ingredient id.
    async fn find_mirror(&self, ingredient_id: &str) -> DbResult<Option<InventoryMirror>>;

    async fn save_mirror(&self, mirror: &InventoryMirror) -> DbResult<()>;

    async fn append_movement(&self, movement: &StockMovement) -> DbResult<()>;

    async fn movements_for_ingredient(&self, ingredient_id: &str) -> DbResult<Vec<StockMovement>>;
}

#[async_trait]
impl LedgerStore for Database {
    async fn find_product(&self, id: &str) -> DbResult<Option<Product>> {
        self.products().get_by_id(id).await
    }

    async fn find_ingredient(&self, id: &str) -> DbResult<Option<Ingredient>> {
        self.ingredients().get_by_id(id).await
    }

    async fn save_ingredient(&self, ingredient: &Ingredient) -> DbResult<()> {
        self.ingredients().update(ingredient).await
    }

    async fn find_mirror(&self, ingredient_id: &str) -> DbResult<Option<InventoryMirror>> {
        self.inventory().get_by_product_id(ingredient_id).await
    }

    async fn save_mirror(&self, mirror: &InventoryMirror) -> DbResult<()> {
        self.inventory().upsert(mirror).await
    }

    async fn append_movement(&self, movement: &StockMovement) -> DbResult<()> {
        self.movements().append(movement).await
    }

    async fn movements_for_ingredient(&self, ingredient_id: &str) -> DbResult<Vec<StockMovement>> {
        self.movements().list_for_ingredient(ingredient_id).await
    }
}
