//! # Product Repository
//!
//! Products and their ordered ingredient associations.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products                     product_ingredients                       │
//! │  ─────────────────────        ──────────────────────────────────────    │
//! │  burger | Burger | 1  ───┬──  burger | required | 0 | bun    | 1.0      │
//! │                          ├──  burger | required | 1 | patty  | 150.0    │
//! │                          └──  burger | optional | 0 | cheese | 20.0     │
//! │                                                                         │
//! │  (role, position) keeps each list in the order it was configured        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kitchen_core::{IngredientLink, LinkRole, Product, ProductKind};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    kind: ProductKind,
    has_ingredients: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    role: LinkRole,
    ingredient_id: String,
    quantity_per_unit: f64,
    name: String,
    unit: String,
}

impl From<LinkRow> for IngredientLink {
    fn from(row: LinkRow) -> Self {
        IngredientLink {
            ingredient_id: row.ingredient_id,
            quantity_per_unit: row.quantity_per_unit,
            name: row.name,
            unit: row.unit,
        }
    }
}

/// Repository for products and their ingredient associations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product with its required and optional associations.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, kind, has_ingredients FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let links = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT role, ingredient_id, quantity_per_unit, name, unit
            FROM product_ingredients
            WHERE product_id = ?1
            ORDER BY role, position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut product = Product {
            id: row.id,
            name: row.name,
            kind: row.kind,
            has_ingredients: row.has_ingredients,
            required_ingredients: Vec::new(),
            optional_ingredients: Vec::new(),
        };

        for link in links {
            match link.role {
                LinkRole::Required => product.required_ingredients.push(link.into()),
                LinkRole::Optional => product.optional_ingredients.push(link.into()),
            }
        }

        Ok(Some(product))
    }

    /// Inserts a product and its associations in one transaction.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO products (id, name, kind, has_ingredients) VALUES (?1, ?2, ?3, ?4)")
            .bind(&product.id)
            .bind(&product.name)
            .bind(product.kind)
            .bind(product.has_ingredients)
            .execute(&mut *tx)
            .await?;

        let lists = [
            (LinkRole::Required, &product.required_ingredients),
            (LinkRole::Optional, &product.optional_ingredients),
        ];

        for (role, links) in lists {
            for (position, link) in links.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO product_ingredients (
                        product_id, role, position, ingredient_id, quantity_per_unit, name, unit
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                )
                .bind(&product.id)
                .bind(role)
                .bind(position as i64)
                .bind(&link.ingredient_id)
                .bind(link.quantity_per_unit)
                .bind(&link.name)
                .bind(&link.unit)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
