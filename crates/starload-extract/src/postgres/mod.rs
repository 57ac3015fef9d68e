use serde_json::{Map, Value};
use sqlx::PgPool;
use starload_core::{Batch, CellValue};
use tracing::warn;

use crate::error::ExtractError;

mod queries;

/// Reads tables of the legacy Postgres database.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    /// Create a new source using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tables(&self) -> Result<Vec<String>, ExtractError> {
        queries::list_tables(&self.pool).await
    }

    /// Read a whole table as raw cells, columns in declaration order.
    ///
    /// Returns `None` when the table does not exist.
    pub async fn fetch_table(&self, table: &str) -> Result<Option<Batch>, ExtractError> {
        let columns = queries::list_columns(&self.pool, table).await?;
        if columns.is_empty() {
            warn!(event = "source_missing", table, "source table not found");
            return Ok(None);
        }

        let mut batch = Batch::new(columns);
        for json in queries::fetch_rows_as_json(&self.pool, table).await? {
            let record: Map<String, Value> = serde_json::from_str(&json)?;
            let row = batch
                .columns()
                .iter()
                .map(|column| record.get(column).map(CellValue::from_json).unwrap_or(CellValue::Null))
                .collect();
            batch.push_row(row)?;
        }
        Ok(Some(batch))
    }
}
