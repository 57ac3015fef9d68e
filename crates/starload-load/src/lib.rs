//! Warehouse loading: replace-table uploads and post-load schema evolution.

pub mod error;
pub mod infer;
pub mod loader;
pub mod postgres;
pub mod sql;

pub use error::LoadError;
pub use infer::{infer_column_type, resolve_column_types, ColumnType};
pub use loader::{IfExists, LoadSummary, WarehouseLoader};
pub use postgres::PostgresLoader;
