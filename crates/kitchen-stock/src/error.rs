//! # Stock Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Error Categories                               │
//! │                                                                         │
//! │  ┌──────────────────────┐  ┌─────────────────┐  ┌───────────────────┐  │
//! │  │  Decided up front    │  │  Business rule  │  │  Side effects     │  │
//! │  │                      │  │                 │  │  (best effort)    │  │
//! │  │  InvalidQuantity     │  │  Insufficient-  │  │  SyncFailure      │  │
//! │  │  ProductNotFound     │  │  Stock (audited)│  │  LogFailure       │  │
//! │  │  IngredientNotFound  │  │                 │  │                   │  │
//! │  │  Store               │  │                 │  │                   │  │
//! │  │  InvalidConfig       │  │                 │  │                   │  │
//! │  └──────────────────────┘  └─────────────────┘  └───────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `InvalidConfig` only comes out of `StockConfig::load`; the others never
//! escape the public service operations. Only
//! `InsufficientStock` leaves a durable trace (an `error` movement);
//! `SyncFailure` and `LogFailure` never change whether a deduction counts as
//! done.

use kitchen_core::{CoreError, ValidationError};
use kitchen_db::DbError;
use thiserror::Error;

/// Result type alias for stock operations.
pub type StockResult<T> = Result<T, StockError>;

#[derive(Debug, Clone, Error)]
pub enum StockError {
    /// Preparation count or deduction quantity was not positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        ingredient_id: String,
        name: String,
        available: f64,
        requested: f64,
    },

    /// Inventory mirror could not be brought in line with the ingredient.
    #[error("Inventory sync failed for {ingredient_id}: {reason}")]
    SyncFailure {
        ingredient_id: String,
        reason: String,
    },

    /// Movement log entry could not be written.
    #[error("Movement log write failed for {ingredient_id}: {reason}")]
    LogFailure {
        ingredient_id: String,
        reason: String,
    },

    /// Ledger read or ingredient write failed.
    #[error("Ledger store error: {0}")]
    Store(#[from] DbError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StockError {
    /// Deficit carried by `InsufficientStock`.
    pub fn deficit(&self) -> Option<f64> {
        match self {
            StockError::InsufficientStock {
                available,
                requested,
                ..
            } => Some(requested - available),
            _ => None,
        }
    }
}

impl From<ValidationError> for StockError {
    fn from(err: ValidationError) -> Self {
        StockError::InvalidQuantity(err.to_string())
    }
}

impl From<std::io::Error> for StockError {
    fn from(err: std::io::Error) -> Self {
        StockError::InvalidConfig(format!("read failed: {}", err))
    }
}

impl From<toml::de::Error> for StockError {
    fn from(err: toml::de::Error) -> Self {
        StockError::InvalidConfig(format!("parse failed: {}", err))
    }
}

impl From<CoreError> for StockError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => v.into(),
        }
    }
}
