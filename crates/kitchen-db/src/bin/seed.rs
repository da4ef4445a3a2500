//! # Seed Data Generator
//!
//! Populates the database with a small demo kitchen.
//!
//! ## Usage
//! ```bash
//! cargo run -p kitchen-db --bin seed
//!
//! # Specify database path (or set KITCHEN_DB_PATH)
//! cargo run -p kitchen-db --bin seed -- --db ./data/kitchen.db
//! ```
//!
//! ## Generated Data
//! - Ingredients: bun, beef patty, cheese, bacon, lettuce, salt (not deductible)
//! - `burger`: required bun/patty/lettuce/salt, optional cheese/bacon
//! - `soda`: sold as-is, no ingredients

use std::env;

use kitchen_core::{Ingredient, IngredientLink, Product, ProductKind};
use kitchen_db::{Database, DbConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// (id, name, unit, stock, minimum, deductible)
const INGREDIENTS: &[(&str, &str, &str, f64, f64, bool)] = &[
    ("bun", "Bun", "unit", 120.0, 20.0, true),
    ("patty", "Beef patty", "g", 15_000.0, 2_000.0, true),
    ("cheese", "Cheese", "g", 4_000.0, 500.0, true),
    ("bacon", "Bacon", "slice", 200.0, 40.0, true),
    ("lettuce", "Lettuce", "g", 2_500.0, 300.0, true),
    ("salt", "Salt", "g", 1_000.0, 0.0, false),
];

fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn ingredient(id: &str, name: &str, unit: &str, stock: f64, minimum: f64, deductible: bool) -> Ingredient {
    let mut ingredient = Ingredient::new(name, unit, stock, minimum);
    ingredient.id = id.to_string();
    ingredient.deductible = deductible;
    ingredient
}

fn menu() -> Vec<Product> {
    vec![
        Product {
            id: "burger".to_string(),
            name: "Classic Burger".to_string(),
            kind: ProductKind::Individual,
            has_ingredients: true,
            required_ingredients: vec![
                IngredientLink::new("bun", 1.0, "Bun", "unit"),
                IngredientLink::new("patty", 150.0, "Beef patty", "g"),
                IngredientLink::new("lettuce", 15.0, "Lettuce", "g"),
                IngredientLink::new("salt", 1.5, "Salt", "g"),
            ],
            optional_ingredients: vec![
                IngredientLink::new("cheese", 25.0, "Cheese", "g"),
                IngredientLink::new("bacon", 2.0, "Bacon", "slice"),
            ],
        },
        Product {
            id: "soda".to_string(),
            name: "Soda".to_string(),
            kind: ProductKind::Individual,
            has_ingredients: false,
            required_ingredients: vec![],
            optional_ingredients: vec![],
        },
    ]
}

async fn seed(db: &Database) -> kitchen_db::DbResult<()> {
    for &(id, name, unit, stock, minimum, deductible) in INGREDIENTS {
        if db.ingredients().get_by_id(id).await?.is_none() {
            db.ingredients()
                .insert(&ingredient(id, name, unit, stock, minimum, deductible))
                .await?;
        }
    }

    for product in menu() {
        if db.products().get_by_id(&product.id).await?.is_none() {
            db.products().insert(&product).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kitchen=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match parse_db_path() {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env_or("kitchen.db"),
    };
    let path = config
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let db = match Database::new(config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open database");
            std::process::exit(1);
        }
    };

    if let Err(e) = seed(&db).await {
        error!(error = %e, "Seeding failed");
        std::process::exit(1);
    }

    let ingredients = db.ingredients().count().await.unwrap_or(0);
    info!(path = %path, ingredients, "Demo kitchen seeded");

    db.close().await;
}
