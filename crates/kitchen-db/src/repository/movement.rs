//! # Movement Repository
//!
//! The stock movement log. Append and read only: there is deliberately no
//! update or delete here, and the schema's triggers reject both anyway.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kitchen_core::StockMovement;

/// Repository for the append-only movement log.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Appends one audit entry.
    pub async fn append(&self, movement: &StockMovement) -> DbResult<()> {
        debug!(
            ingredient_id = %movement.ingredient_id,
            kind = ?movement.kind,
            delta = movement.quantity_delta,
            "Appending stock movement"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, ingredient_id, ingredient_name, kind, reason,
                quantity_before, quantity_delta, quantity_after,
                responsible, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.ingredient_id)
        .bind(&movement.ingredient_name)
        .bind(movement.kind)
        .bind(&movement.reason)
        .bind(movement.quantity_before)
        .bind(movement.quantity_delta)
        .bind(movement.quantity_after)
        .bind(&movement.responsible)
        .bind(&movement.notes)
        .bind(movement.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// An ingredient's audit trail, oldest first.
    pub async fn list_for_ingredient(&self, ingredient_id: &str) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT
                id, ingredient_id, ingredient_name, kind, reason,
                quantity_before, quantity_delta, quantity_after,
                responsible, notes, created_at
            FROM stock_movements
            WHERE ingredient_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(ingredient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Total number of log entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
