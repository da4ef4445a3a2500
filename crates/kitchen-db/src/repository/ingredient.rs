//! # Ingredient Repository
//!
//! Database operations for ingredients.
//!
//! Stock is written back as an absolute value: the deduction service has
//! already checked the invariant against the value it read, under its
//! per-ingredient lock.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kitchen_core::Ingredient;

const SELECT_INGREDIENT: &str = r#"
    SELECT id, name, unit, current_stock, minimum_stock, deductible, created_at, updated_at
    FROM ingredients
"#;

/// Repository for ingredient database operations.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    pool: SqlitePool,
}

impl IngredientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        IngredientRepository { pool }
    }

    /// Gets an ingredient by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Ingredient))` - Ingredient found
    /// * `Ok(None)` - Ingredient not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(&format!("{SELECT_INGREDIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ingredient)
    }

    /// Lists every ingredient ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(&format!("{SELECT_INGREDIENT} ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        Ok(ingredients)
    }

    /// Inserts a new ingredient.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - ID already exists
    pub async fn insert(&self, ingredient: &Ingredient) -> DbResult<()> {
        debug!(id = %ingredient.id, name = %ingredient.name, "Inserting ingredient");

        sqlx::query(
            r#"
            INSERT INTO ingredients (
                id, name, unit, current_stock, minimum_stock, deductible, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ingredient.id)
        .bind(&ingredient.name)
        .bind(&ingredient.unit)
        .bind(ingredient.current_stock)
        .bind(ingredient.minimum_stock)
        .bind(ingredient.deductible)
        .bind(ingredient.created_at)
        .bind(ingredient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes every mutable field of an existing ingredient.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Ingredient doesn't exist
    pub async fn update(&self, ingredient: &Ingredient) -> DbResult<()> {
        debug!(
            id = %ingredient.id,
            current_stock = ingredient.current_stock,
            "Updating ingredient"
        );

        let result = sqlx::query(
            r#"
            UPDATE ingredients SET
                name = ?2,
                unit = ?3,
                current_stock = ?4,
                minimum_stock = ?5,
                deductible = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&ingredient.id)
        .bind(&ingredient.name)
        .bind(&ingredient.unit)
        .bind(ingredient.current_stock)
        .bind(ingredient.minimum_stock)
        .bind(ingredient.deductible)
        .bind(ingredient.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ingredient", &ingredient.id));
        }

        Ok(())
    }

    /// Counts ingredients (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::{Database, DbConfig};

    async fn repo() -> IngredientRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.ingredients()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let mut cheese = Ingredient::new("Cheese", "g", 10.5, 2.0);
        cheese.deductible = false;
        repo.insert(&cheese).await.unwrap();

        let loaded = repo.get_by_id(&cheese.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Cheese");
        assert_eq!(loaded.current_stock, 10.5);
        assert!(!loaded.deductible);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_stock() {
        let repo = repo().await;
        let mut cheese = Ingredient::new("Cheese", "g", 10.0, 2.0);
        repo.insert(&cheese).await.unwrap();

        let stamped = Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 0).unwrap();
        cheese.current_stock = 7.25;
        cheese.updated_at = stamped;
        repo.update(&cheese).await.unwrap();

        let loaded = repo.get_by_id(&cheese.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_stock, 7.25);
        assert_eq!(loaded.updated_at, stamped);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let ghost = Ingredient::new("Ghost", "g", 1.0, 0.0);
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let repo = repo().await;
        let cheese = Ingredient::new("Cheese", "g", 10.0, 2.0);
        repo.insert(&cheese).await.unwrap();
        let err = repo.insert(&cheese).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
