//! # kitchen-db: Database Layer for the Titan Kitchen
//!
//! SQLite storage for ingredients, products, the inventory mirror and the
//! stock movement log, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kitchen-stock (LedgerStore for Database)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   kitchen-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐    ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │    │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ IngredientRepo   │    │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ ProductRepo      │    │ 001_init   │  │   │
//! │  │   │               │    │ InventoryRepo    │    │            │  │   │
//! │  │   │               │    │ MovementRepo     │    │            │  │   │
//! │  │   └───────────────┘    └──────────────────┘    └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL mode)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kitchen_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kitchen.db")).await?;
//! let cheese = db.ingredients().get_by_id("cheese").await?;
//! ```

pub mod error;
pub mod migrations;

pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation, DB_PATH_ENV};

pub use repository::ingredient::IngredientRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
