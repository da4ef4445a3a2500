//! # Inventory Repository
//!
//! The inventory mirror: one row per ingredient, keyed by `product_id`
//! (which holds the ingredient id).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kitchen_core::InventoryMirror;

/// Repository for inventory mirror records.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Finds the mirror record for an ingredient.
    pub async fn get_by_product_id(&self, product_id: &str) -> DbResult<Option<InventoryMirror>> {
        let mirror = sqlx::query_as::<_, InventoryMirror>(
            r#"
            SELECT
                id, product_id, product_name, category, current_quantity,
                minimum_quantity, unit, unit_cost_cents, last_updated, status
            FROM inventory
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mirror)
    }

    /// Inserts the record, or overwrites the existing row for the same
    /// `product_id`. The original row id is kept on overwrite.
    pub async fn upsert(&self, mirror: &InventoryMirror) -> DbResult<()> {
        debug!(
            product_id = %mirror.product_id,
            quantity = mirror.current_quantity,
            "Upserting inventory mirror"
        );

        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, product_id, product_name, category, current_quantity,
                minimum_quantity, unit, unit_cost_cents, last_updated, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(product_id) DO UPDATE SET
                product_name = excluded.product_name,
                category = excluded.category,
                current_quantity = excluded.current_quantity,
                minimum_quantity = excluded.minimum_quantity,
                unit = excluded.unit,
                unit_cost_cents = excluded.unit_cost_cents,
                last_updated = excluded.last_updated,
                status = excluded.status
            "#,
        )
        .bind(&mirror.id)
        .bind(&mirror.product_id)
        .bind(&mirror.product_name)
        .bind(&mirror.category)
        .bind(mirror.current_quantity)
        .bind(mirror.minimum_quantity)
        .bind(&mirror.unit)
        .bind(mirror.unit_cost_cents)
        .bind(mirror.last_updated)
        .bind(&mirror.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
