use std::time::Instant;

use serde::Serialize;
use starload_clean::{clean, CleanOutput, CleanReport};
use starload_core::{Batch, Entity};
use starload_extract::Extractor;
use starload_load::{IfExists, WarehouseLoader};
use tracing::info;

use crate::catalog::SourceCatalog;
use crate::error::PipelineError;
use crate::migrations::{apply_migrations, MigrationFailure};
use crate::tables::{load_order, table_spec, TableSpec, ORDERS_TABLE};

async fn extract<E>(
    extractor: &E,
    catalog: &SourceCatalog,
    entity: Entity,
) -> Result<Batch, PipelineError>
where
    E: Extractor + ?Sized,
{
    extractor
        .fetch(catalog.source(entity))
        .await?
        .ok_or(PipelineError::MissingSource(entity))
}

/// Extract and clean one entity. Needs no warehouse, so dry runs use it
/// directly.
pub async fn extract_and_clean<E>(
    extractor: &E,
    catalog: &SourceCatalog,
    entity: Entity,
) -> Result<CleanOutput, PipelineError>
where
    E: Extractor + ?Sized,
{
    let raw = extract(extractor, catalog, entity).await?;
    Ok(clean(entity, raw))
}

/// State of the orders fact table before a dimension upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prerequisite {
    AlreadyPresent,
    Created,
}

/// What one table upload did.
#[derive(Debug, Clone, Serialize)]
pub struct TableOutcome {
    pub entity: Entity,
    pub table: String,
    /// Orders-table guard result; `None` for the orders table itself.
    pub prerequisite: Option<Prerequisite>,
    pub rows_extracted: usize,
    pub rows_loaded: u64,
    pub rows_dropped: usize,
    pub migration_failures: Vec<MigrationFailure>,
    pub clean_report: CleanReport,
    pub duration_ms: u64,
}

/// Wires extraction, cleaning and loading for every warehouse table.
pub struct StarSchemaService<E, L> {
    extractor: E,
    loader: L,
    catalog: SourceCatalog,
}

impl<E, L> StarSchemaService<E, L>
where
    E: Extractor,
    L: WarehouseLoader,
{
    pub fn new(extractor: E, loader: L, catalog: SourceCatalog) -> Self {
        Self {
            extractor,
            loader,
            catalog,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Extract and clean one entity without touching the warehouse.
    pub async fn prepare(&self, entity: Entity) -> Result<CleanOutput, PipelineError> {
        extract_and_clean(&self.extractor, &self.catalog, entity).await
    }

    /// Make sure the orders fact table exists, loading it when it does not.
    pub async fn ensure_orders_table(&self) -> Result<Prerequisite, PipelineError> {
        if self.loader.table_exists(ORDERS_TABLE).await? {
            info!(event = "orders_table_present", table = ORDERS_TABLE, "orders table already loaded");
            return Ok(Prerequisite::AlreadyPresent);
        }
        info!(event = "orders_table_missing", table = ORDERS_TABLE, "loading orders table first");
        self.load_table(table_spec(Entity::Orders), None).await?;
        Ok(Prerequisite::Created)
    }

    /// Upload one entity's table. Dimension uploads first make sure the
    /// orders table exists.
    pub async fn upload(&self, entity: Entity) -> Result<TableOutcome, PipelineError> {
        let prerequisite = match entity {
            Entity::Orders => None,
            _ => Some(self.ensure_orders_table().await?),
        };
        self.load_table(table_spec(entity), prerequisite).await
    }

    /// Upload every table in load order; the first error stops the run.
    pub async fn upload_all(&self) -> Result<Vec<TableOutcome>, PipelineError> {
        let mut outcomes = Vec::new();
        for entity in load_order()? {
            outcomes.push(self.upload(entity).await?);
        }
        Ok(outcomes)
    }

    async fn load_table(
        &self,
        spec: &TableSpec,
        prerequisite: Option<Prerequisite>,
    ) -> Result<TableOutcome, PipelineError> {
        let start = Instant::now();
        let raw = extract(&self.extractor, &self.catalog, spec.entity).await?;
        let rows_extracted = raw.len();
        let CleanOutput { batch, report } = clean(spec.entity, raw);

        let summary = self
            .loader
            .load(&batch, spec.table, spec.hints, IfExists::Replace)
            .await?;
        let migration_failures = apply_migrations(&self.loader, spec.table, spec.migrations).await;

        let outcome = TableOutcome {
            entity: spec.entity,
            table: spec.table.to_string(),
            prerequisite,
            rows_extracted,
            rows_loaded: summary.rows_loaded,
            rows_dropped: report.rows_dropped(),
            migration_failures,
            clean_report: report,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            event = "table_uploaded",
            entity = %spec.entity,
            table = spec.table,
            rows_extracted = outcome.rows_extracted,
            rows_loaded = outcome.rows_loaded,
            rows_dropped = outcome.rows_dropped,
            migration_failures = outcome.migration_failures.len(),
            duration_ms = outcome.duration_ms,
            "table uploaded"
        );
        Ok(outcome)
    }
}
