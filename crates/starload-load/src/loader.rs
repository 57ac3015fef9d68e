use async_trait::async_trait;
use serde::Serialize;
use starload_core::{Batch, ColumnHint, ForeignKey, PrimaryKey, SqlType};

use crate::error::LoadError;
use crate::infer::ColumnType;
use crate::sql;

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IfExists {
    /// Drop it (cascading to dependent constraints) and recreate it.
    Replace,
    Fail,
}

/// Outcome of one table upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub table: String,
    pub rows_loaded: u64,
    pub columns: Vec<ColumnType>,
}

/// Capability to persist cleaned batches into the warehouse and evolve the
/// loaded tables afterwards.
///
/// Only [`load`](Self::load), [`table_exists`](Self::table_exists) and
/// [`execute`](Self::execute) touch the database; the schema-evolution calls
/// build their statement and hand it to `execute`.
#[async_trait]
pub trait WarehouseLoader: Send + Sync {
    /// Upload `batch` as `table`. Hinted columns get the hinted type, the
    /// others a type inferred from their cells.
    async fn load(
        &self,
        batch: &Batch,
        table: &str,
        hints: &[ColumnHint],
        if_exists: IfExists,
    ) -> Result<LoadSummary, LoadError>;

    async fn table_exists(&self, table: &str) -> Result<bool, LoadError>;

    /// Run one statement, returning the affected row count.
    async fn execute(&self, statement: &str) -> Result<u64, LoadError>;

    async fn alter_column_types(&self, table: &str, hints: &[ColumnHint]) -> Result<(), LoadError> {
        if hints.is_empty() {
            return Ok(());
        }
        self.execute(&sql::alter_column_types(table, hints)).await?;
        Ok(())
    }

    async fn add_primary_key(&self, key: &PrimaryKey) -> Result<(), LoadError> {
        self.execute(&sql::add_primary_key(key)).await?;
        Ok(())
    }

    async fn add_foreign_key(&self, key: &ForeignKey) -> Result<(), LoadError> {
        self.execute(&sql::add_foreign_key(key)).await?;
        Ok(())
    }

    async fn rename_column(&self, table: &str, from: &str, to: &str) -> Result<(), LoadError> {
        self.execute(&sql::rename_column(table, from, to)).await?;
        Ok(())
    }

    async fn add_column(&self, table: &str, column: &str, sql_type: SqlType) -> Result<(), LoadError> {
        self.execute(&sql::add_column(table, column, sql_type)).await?;
        Ok(())
    }
}
