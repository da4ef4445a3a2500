//! End-to-end preparation workflow over an in-memory SQLite ledger.

use std::sync::Arc;

use kitchen_core::{Ingredient, IngredientLink, MovementKind, Product, ProductKind};
use kitchen_db::{Database, DbConfig};
use kitchen_stock::{
    IngredientStockService, LedgerStore, OutcomeStatus, RecordingObserver, StockConfig, StockEvent,
};

struct Kitchen {
    db: Database,
    observer: Arc<RecordingObserver>,
    service: IngredientStockService,
}

fn ingredient(id: &str, name: &str, unit: &str, stock: f64, minimum: f64) -> Ingredient {
    let mut ingredient = Ingredient::new(name, unit, stock, minimum);
    ingredient.id = id.to_string();
    ingredient
}

async fn kitchen() -> Kitchen {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    db.ingredients()
        .insert(&ingredient("bun", "Bun", "unit", 50.0, 5.0))
        .await
        .unwrap();
    db.ingredients()
        .insert(&ingredient("cheese", "Cheese", "g", 10.0, 2.0))
        .await
        .unwrap();
    let mut salt = ingredient("salt", "Salt", "g", 500.0, 0.0);
    salt.deductible = false;
    db.ingredients().insert(&salt).await.unwrap();

    db.products()
        .insert(&Product {
            id: "burger".into(),
            name: "Cheeseburger".into(),
            kind: ProductKind::Individual,
            has_ingredients: true,
            required_ingredients: vec![
                IngredientLink::new("bun", 1.0, "Bun", "unit"),
                IngredientLink::new("salt", 1.0, "Salt", "g"),
            ],
            optional_ingredients: vec![IngredientLink::new("cheese", 1.0, "Cheese", "g")],
        })
        .await
        .unwrap();
    db.products()
        .insert(&Product {
            id: "water".into(),
            name: "Water".into(),
            kind: ProductKind::Individual,
            has_ingredients: false,
            required_ingredients: vec![],
            optional_ingredients: vec![],
        })
        .await
        .unwrap();

    let observer = RecordingObserver::new();
    let service = IngredientStockService::with_observer(
        Arc::new(db.clone()),
        StockConfig::default(),
        observer.clone(),
    );

    Kitchen {
        db,
        observer,
        service,
    }
}

async fn cheese_stock(db: &Database) -> f64 {
    db.ingredients()
        .get_by_id("cheese")
        .await
        .unwrap()
        .unwrap()
        .current_stock
}

fn cheese() -> Option<Vec<String>> {
    Some(vec!["cheese".to_string()])
}

#[tokio::test]
async fn deducts_three_grams_of_cheese() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("burger", 3, cheese(), "Order #1").await;

    assert!(report.is_complete());
    assert_eq!(cheese_stock(&k.db).await, 7.0);

    let trail = k.db.movements_for_ingredient("cheese").await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].kind, MovementKind::Outflow);
    assert_eq!(trail[0].quantity_before, 10.0);
    assert_eq!(trail[0].quantity_delta, -3.0);
    assert_eq!(trail[0].quantity_after, 7.0);
    assert_eq!(trail[0].notes, "Automatic inventory deduction");
    assert!(k.observer.low_stock_warnings().is_empty());

    let mirror = k.db.inventory().get_by_product_id("cheese").await.unwrap().unwrap();
    assert_eq!(mirror.current_quantity, 7.0);
    assert_eq!(mirror.category, "ingredient");
    assert_eq!(mirror.status, "active");
}

#[tokio::test]
async fn rejects_twelve_grams_of_cheese() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("burger", 12, cheese(), "Order #2").await;

    let outcome = report.outcome("cheese").unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Rejected);
    assert_eq!(cheese_stock(&k.db).await, 10.0);

    let trail = k.db.movements_for_ingredient("cheese").await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].kind, MovementKind::Error);
    assert_eq!(trail[0].quantity_before, 10.0);
    assert_eq!(trail[0].quantity_delta, 0.0);
    assert_eq!(trail[0].quantity_after, 10.0);
    assert_eq!(trail[0].notes, "Failed attempt - required: 12, available: 10");

    // bun is independent of the cheese rejection
    let bun = k.db.ingredients().get_by_id("bun").await.unwrap().unwrap();
    assert_eq!(bun.current_stock, 38.0);
    assert!(k.db.inventory().get_by_product_id("cheese").await.unwrap().is_none());
}

#[tokio::test]
async fn nine_grams_leaves_cheese_low() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("burger", 9, cheese(), "Order #3").await;

    assert!(report.is_complete());
    assert_eq!(cheese_stock(&k.db).await, 1.0);

    let warnings = k.observer.low_stock_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].ingredient_id, "cheese");
    assert_eq!(warnings[0].stock_after, 1.0);

    let trail = k.db.movements_for_ingredient("cheese").await.unwrap();
    assert_eq!(trail[0].kind, MovementKind::Outflow);
}

#[tokio::test]
async fn non_deductible_ingredient_is_untouched() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("burger", 2, None, "Order #4").await;

    assert_eq!(report.outcome("salt").map(|o| o.status), Some(OutcomeStatus::NotDeductible));
    let salt = k.db.ingredients().get_by_id("salt").await.unwrap().unwrap();
    assert_eq!(salt.current_stock, 500.0);
    assert!(k.db.movements_for_ingredient("salt").await.unwrap().is_empty());
    assert!(k.observer.events().iter().any(|e| matches!(
        e,
        StockEvent::SkippedNonDeductible { ingredient_id, .. } if ingredient_id == "salt"
    )));
}

#[tokio::test]
async fn unselected_optional_is_not_deducted() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("burger", 1, None, "Order #5").await;

    assert_eq!(report.skipped_optional, vec!["cheese".to_string()]);
    assert_eq!(cheese_stock(&k.db).await, 10.0);
}

#[tokio::test]
async fn non_positive_quantity_changes_nothing() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("burger", 0, cheese(), "Order #6").await;

    assert!(report.rejected);
    assert_eq!(cheese_stock(&k.db).await, 10.0);
    assert_eq!(k.db.movements().count().await.unwrap(), 0);
}

#[tokio::test]
async fn product_without_ingredients_is_a_no_op() {
    let k = kitchen().await;

    let report = k.service.deduct_ingredients("water", 5, cheese(), "Order #7").await;
    assert!(report.no_ingredients);
    assert_eq!(k.db.movements().count().await.unwrap(), 0);

    let check = k.service.validate_availability("water", 5, None).await;
    assert!(check.sufficient);
    assert_eq!(
        check.message.as_deref(),
        Some("Product has no ingredients - no validation required")
    );
}

#[tokio::test]
async fn validation_is_read_only_and_repeatable() {
    let k = kitchen().await;

    let first = k.service.validate_availability("burger", 11, cheese()).await;
    let second = k.service.validate_availability("burger", 11, cheese()).await;

    assert_eq!(first, second);
    assert!(!first.sufficient);
    assert_eq!(first.shortfalls.len(), 1);
    assert_eq!(first.shortfalls[0].deficit, 1.0);
    assert_eq!(cheese_stock(&k.db).await, 10.0);
    assert_eq!(k.db.movements().count().await.unwrap(), 0);
    assert!(k.db.inventory().get_by_product_id("cheese").await.unwrap().is_none());
}

#[tokio::test]
async fn mirror_follows_successive_deductions() {
    let k = kitchen().await;

    k.service.deduct_ingredients("burger", 2, cheese(), "Order #8").await;
    let created = k.db.inventory().get_by_product_id("cheese").await.unwrap().unwrap();
    assert_eq!(created.current_quantity, 8.0);

    k.service.deduct_ingredients("burger", 3, cheese(), "Order #9").await;
    let updated = k.db.inventory().get_by_product_id("cheese").await.unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.current_quantity, 5.0);

    let trail = k.db.movements_for_ingredient("cheese").await.unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[1].quantity_before, 8.0);
    assert_eq!(trail[1].quantity_after, 5.0);
}
