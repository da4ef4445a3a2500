//! # In-Memory Ledger
//!
//! A `LedgerStore` backed by hash maps, with switches that make individual
//! reads or writes fail. Used by the service tests to exercise the
//! best-effort and in-band error paths without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use kitchen_core::{Ingredient, InventoryMirror, Product, StockMovement};
use kitchen_db::{DbError, DbResult};
use tokio::sync::RwLock;

use crate::store::LedgerStore;

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    products: RwLock<HashMap<String, Product>>,
    ingredients: RwLock<HashMap<String, Ingredient>>,
    mirrors: RwLock<HashMap<String, InventoryMirror>>,
    movements: RwLock<Vec<StockMovement>>,

    fail_product_reads: AtomicBool,
    fail_ingredient_reads: AtomicBool,
    fail_ingredient_writes: AtomicBool,
    fail_mirror_writes: AtomicBool,
    fail_movement_writes: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_product(&self, product: Product) {
        self.products.write().await.insert(product.id.clone(), product);
    }

    pub async fn put_ingredient(&self, ingredient: Ingredient) {
        self.ingredients
            .write()
            .await
            .insert(ingredient.id.clone(), ingredient);
    }

    pub async fn remove_ingredient(&self, id: &str) {
        self.ingredients.write().await.remove(id);
    }

    pub async fn put_mirror(&self, mirror: InventoryMirror) {
        self.mirrors
            .write()
            .await
            .insert(mirror.product_id.clone(), mirror);
    }

    /// Every movement, across all ingredients, in append order.
    pub async fn all_movements(&self) -> Vec<StockMovement> {
        self.movements.read().await.clone()
    }

    pub async fn mirror_count(&self) -> usize {
        self.mirrors.read().await.len()
    }

    // =========================================================================
    // Failure Injection
    // =========================================================================

    pub fn fail_product_reads(&self, fail: bool) {
        self.fail_product_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_ingredient_reads(&self, fail: bool) {
        self.fail_ingredient_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_ingredient_writes(&self, fail: bool) {
        self.fail_ingredient_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mirror_writes(&self, fail: bool) {
        self.fail_mirror_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_movement_writes(&self, fail: bool) {
        self.fail_movement_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, what: &str) -> DbResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(DbError::QueryFailed(format!("injected {} failure", what)));
        }
        Ok(())
    }

    fn check_read(flag: &AtomicBool) -> DbResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("ledger offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn find_product(&self, id: &str) -> DbResult<Option<Product>> {
        Self::check_read(&self.fail_product_reads)?;
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn find_ingredient(&self, id: &str) -> DbResult<Option<Ingredient>> {
        Self::check_read(&self.fail_ingredient_reads)?;
        Ok(self.ingredients.read().await.get(id).cloned())
    }

    async fn save_ingredient(&self, ingredient: &Ingredient) -> DbResult<()> {
        Self::check(&self.fail_ingredient_writes, "ingredient write")?;

        let mut ingredients = self.ingredients.write().await;
        match ingredients.get_mut(&ingredient.id) {
            Some(existing) => {
                *existing = ingredient.clone();
                Ok(())
            }
            None => Err(DbError::not_found("Ingredient", &ingredient.id)),
        }
    }

    async fn find_mirror(&self, ingredient_id: &str) -> DbResult<Option<InventoryMirror>> {
        Ok(self.mirrors.read().await.get(ingredient_id).cloned())
    }

    async fn save_mirror(&self, mirror: &InventoryMirror) -> DbResult<()> {
        Self::check(&self.fail_mirror_writes, "mirror write")?;
        self.put_mirror(mirror.clone()).await;
        Ok(())
    }

    async fn append_movement(&self, movement: &StockMovement) -> DbResult<()> {
        Self::check(&self.fail_movement_writes, "movement write")?;
        self.movements.write().await.push(movement.clone());
        Ok(())
    }

    async fn movements_for_ingredient(&self, ingredient_id: &str) -> DbResult<Vec<StockMovement>> {
        Ok(self
            .movements
            .read()
            .await
            .iter()
            .filter(|m| m.ingredient_id == ingredient_id)
            .cloned()
            .collect())
    }
}
