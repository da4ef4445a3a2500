//! # Schema Migrations
//!
//! The ledger schema ships inside the binary. Files live in the workspace
//! `migrations/sqlite/` directory and run in filename order, each in its
//! own transaction. Applied files are never edited; schema changes go in a
//! new `NNN_*.sql` file.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   ingredients, products, inventory,
//!                              stock_movements + append-only triggers
//! ```

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static LEDGER_SCHEMA: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a ledger file is behind the embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Brings the ledger schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = schema_status(pool).await?;
    if before.is_current() {
        info!(applied = before.applied, "Ledger schema is current");
        return Ok(());
    }

    LEDGER_SCHEMA.run(pool).await?;

    info!(
        pending = before.embedded - before.applied,
        "Ledger schema migrated"
    );
    Ok(())
}

/// Counts embedded and applied migrations. A fresh file, with no
/// bookkeeping table yet, reports zero applied.
pub async fn schema_status(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    let counted = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await;

    let applied = match counted {
        Ok(n) => n,
        Err(sqlx::Error::Database(e)) if e.message().contains("no such table") => 0,
        Err(e) => return Err(e.into()),
    };

    Ok(SchemaStatus {
        embedded: LEDGER_SCHEMA.migrations.len(),
        applied: applied.max(0) as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_fresh_ledger_reports_nothing_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = schema_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());

        run_migrations(db.pool()).await.unwrap();
        assert!(schema_status(db.pool()).await.unwrap().is_current());
    }

    #[tokio::test]
    async fn test_unreadable_ledger_is_an_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = schema_status(db.pool()).await.unwrap_err();
        assert!(err.is_transient());
    }
}
