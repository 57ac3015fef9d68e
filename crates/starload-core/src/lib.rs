//! Core contracts and helpers for starload.
//!
//! This crate defines cell values and batches, the entity schemas that drive
//! cleaning, warehouse column types and key constraints, and utilities shared
//! by the extract, clean, load and pipeline crates.

pub mod batch;
pub mod constraints;
pub mod error;
pub mod graph;
pub mod redaction;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;
pub mod warehouse;

pub use batch::{Batch, INDEX_COLUMN};
pub use constraints::{Constraint, ForeignKey, PrimaryKey};
pub use error::{Error, Result};
pub use graph::{build_load_order, FkGraphSummary, LoadOrderReport};
pub use redaction::{redact_connection_string, redact_secret, RedactedConnection};
pub use schema::{Entity, EntitySchema, FieldSpec, Reshape};
pub use types::{hinted_type, ClosedSet, CodeKind, ColumnHint, FieldType, SqlType};
pub use validation::validate_warehouse;
pub use value::CellValue;
pub use warehouse::{WarehouseModel, WarehouseTable};
