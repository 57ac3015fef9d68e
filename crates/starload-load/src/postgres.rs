use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use starload_core::{Batch, ColumnHint};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::infer::resolve_column_types;
use crate::loader::{IfExists, LoadSummary, WarehouseLoader};
use crate::sql;

/// Loader writing to a Postgres warehouse.
#[derive(Debug, Clone)]
pub struct PostgresLoader {
    pool: PgPool,
}

impl PostgresLoader {
    /// Create a new loader using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WarehouseLoader for PostgresLoader {
    async fn load(
        &self,
        batch: &Batch,
        table: &str,
        hints: &[ColumnHint],
        if_exists: IfExists,
    ) -> Result<LoadSummary, LoadError> {
        let start = Instant::now();
        if batch.columns().is_empty() {
            return Err(LoadError::SchemaMismatch {
                table: table.to_string(),
                message: "batch has no columns".to_string(),
            });
        }
        if if_exists == IfExists::Fail && self.table_exists(table).await? {
            return Err(LoadError::TableExists(table.to_string()));
        }

        let columns = resolve_column_types(batch, hints);
        let mut tx = self.pool.begin().await?;
        sqlx::query(&sql::drop_table(table)).execute(&mut *tx).await?;
        sqlx::query(&sql::create_table(table, &columns))
            .execute(&mut *tx)
            .await?;

        let mut rows_loaded = 0u64;
        for chunk in batch.rows().chunks(sql::rows_per_insert(columns.len())) {
            let statement = sql::insert_rows(table, &columns, chunk.len());
            let mut query = sqlx::query(&statement);
            for cell in chunk.iter().flatten() {
                query = query.bind(cell.render());
            }
            rows_loaded += query
                .execute(&mut *tx)
                .await
                .map_err(|err| classify(table, err))?
                .rows_affected();
        }
        tx.commit().await?;

        info!(
            event = "table_loaded",
            table,
            rows = rows_loaded,
            columns = columns.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "table loaded"
        );
        Ok(LoadSummary {
            table: table.to_string(),
            rows_loaded,
            columns,
        })
    }

    async fn table_exists(&self, table: &str) -> Result<bool, LoadError> {
        let exists = sqlx::query_scalar::<_, bool>(sql::TABLE_EXISTS)
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn execute(&self, statement: &str) -> Result<u64, LoadError> {
        debug!(event = "statement_executed", statement, "executing statement");
        let result = sqlx::query(statement).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Cells that do not fit their column type surface as a schema mismatch:
/// SQLSTATE class 22 (data exception) or 42804 (datatype mismatch).
fn classify(table: &str, err: sqlx::Error) -> LoadError {
    if let sqlx::Error::Database(db) = &err {
        let code = db.code().unwrap_or_default();
        if code.starts_with("22") || code == "42804" {
            return LoadError::SchemaMismatch {
                table: table.to_string(),
                message: db.message().to_string(),
            };
        }
    }
    LoadError::Db(err)
}
