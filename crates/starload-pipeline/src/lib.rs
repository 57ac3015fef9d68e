//! Star-schema pipeline: extract, clean and load each warehouse table.

pub mod catalog;
pub mod error;
pub mod migrations;
pub mod service;
pub mod tables;

pub use catalog::SourceCatalog;
pub use error::PipelineError;
pub use migrations::{apply_migrations, Migration, MigrationFailure};
pub use service::{extract_and_clean, Prerequisite, StarSchemaService, TableOutcome};
pub use tables::{load_order, table_spec, warehouse_model, TableSpec, ORDERS_TABLE, TABLE_SPECS};
