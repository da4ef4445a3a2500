//! # Ledger Store Errors
//!
//! Every SQLite failure the ledger can hit, sorted into the handful of
//! cases the stock service actually reacts to.
//!
//! ```text
//!  sqlx::Error ──► DbError ──► StockError::Store / SyncFailure / LogFailure
//!                                   │
//!                                   ▼
//!                     recorded on the ingredient outcome
//! ```

use thiserror::Error;

/// Failure from a ledger table read or write.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Lookup or update addressed a row that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A second row for a key that must be unique, such as a second
    /// inventory mirror for one ingredient.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Link to an ingredient or product row that is not there.
    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    /// The movement trigger refused an UPDATE or DELETE.
    #[error("Movement log is append-only: {0}")]
    AppendOnlyViolation(String),

    /// Pool closed or timed out waiting for a connection.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// Statement rejected by SQLite for any other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Row decoding, I/O and anything else sqlx reports.
    #[error("Ledger store error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::Unavailable(_))
    }

    /// Sorts a message raised by SQLite itself.
    ///
    /// ```text
    /// RAISE(ABORT, '... append-only ...')  → AppendOnlyViolation
    /// UNIQUE constraint failed: t.col      → UniqueViolation { field: "t.col" }
    /// FOREIGN KEY constraint failed        → DanglingReference
    /// anything else                        → QueryFailed
    /// ```
    fn from_sqlite_message(msg: &str) -> Self {
        if msg.contains("append-only") {
            return DbError::AppendOnlyViolation(msg.to_string());
        }
        if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
            return DbError::duplicate(column, "?");
        }
        if msg.contains("FOREIGN KEY constraint failed") {
            return DbError::DanglingReference(msg.to_string());
        }
        DbError::QueryFailed(msg.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => DbError::from_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::Unavailable("timed out acquiring a connection".into()),
            sqlx::Error::PoolClosed => DbError::Unavailable("pool is closed".into()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
