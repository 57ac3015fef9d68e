//! Post-load schema evolution of warehouse tables.
//!
//! Migrations run in declaration order after a table is loaded. A failing
//! migration is logged and recorded; the remaining ones still run.

use serde::Serialize;
use starload_clean::weight_class_case_sql;
use starload_core::{ColumnHint, ForeignKey, PrimaryKey};
use starload_load::{sql, LoadError, WarehouseLoader};
use tracing::{info, warn};

use crate::tables::ORDERS_TABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Migration {
    /// `ALTER COLUMN ... TYPE ... USING col::type` for every listed column.
    AlterTypes { columns: &'static [ColumnHint] },
    AddColumn { column: ColumnHint },
    RenameColumn { from: &'static str, to: &'static str },
    /// Fill `class` with the weight-class label of `weight`.
    WeightClass { weight: &'static str, class: &'static str },
    /// Turn a text flag into `'true'`/`'false'` ahead of a boolean cast.
    FlagToBoolean { column: &'static str, true_value: &'static str },
    StripCharacter { column: &'static str, character: &'static str },
    PrimaryKey { column: &'static str },
    /// Reference this table from the orders fact table on a shared column.
    ForeignKey { column: &'static str },
}

impl Migration {
    pub fn label(&self) -> String {
        match self {
            Migration::AlterTypes { columns } => format!("alter_types({})", columns.len()),
            Migration::AddColumn { column } => format!("add_column({})", column.column),
            Migration::RenameColumn { from, to } => format!("rename_column({from}->{to})"),
            Migration::WeightClass { class, .. } => format!("weight_class({class})"),
            Migration::FlagToBoolean { column, .. } => format!("flag_to_boolean({column})"),
            Migration::StripCharacter { column, .. } => format!("strip_character({column})"),
            Migration::PrimaryKey { column } => format!("primary_key({column})"),
            Migration::ForeignKey { column } => format!("foreign_key({column})"),
        }
    }

    async fn run<L>(&self, loader: &L, table: &str) -> Result<(), LoadError>
    where
        L: WarehouseLoader + ?Sized,
    {
        match *self {
            Migration::AlterTypes { columns } => loader.alter_column_types(table, columns).await,
            Migration::AddColumn { column } => {
                loader.add_column(table, column.column, column.sql_type).await
            }
            Migration::RenameColumn { from, to } => loader.rename_column(table, from, to).await,
            Migration::WeightClass { weight, class } => {
                let case = weight_class_case_sql(&sql::quote_ident(weight));
                loader.execute(&sql::update_column(table, class, &case)).await.map(drop)
            }
            Migration::FlagToBoolean { column, true_value } => loader
                .execute(&sql::flag_to_boolean(table, column, true_value))
                .await
                .map(drop),
            Migration::StripCharacter { column, character } => loader
                .execute(&sql::strip_character(table, column, character))
                .await
                .map(drop),
            Migration::PrimaryKey { column } => {
                loader.add_primary_key(&PrimaryKey::new(table, column)).await
            }
            Migration::ForeignKey { column } => {
                loader
                    .add_foreign_key(&ForeignKey::on_shared_column(ORDERS_TABLE, table, column))
                    .await
            }
        }
    }
}

/// A migration that did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFailure {
    pub migration: String,
    pub error: String,
}

pub async fn apply_migrations<L>(
    loader: &L,
    table: &str,
    migrations: &[Migration],
) -> Vec<MigrationFailure>
where
    L: WarehouseLoader + ?Sized,
{
    let mut failures = Vec::new();
    for migration in migrations {
        let label = migration.label();
        match migration.run(loader, table).await {
            Ok(()) => info!(event = "migration_applied", table, migration = %label, "migration applied"),
            Err(err) => {
                warn!(
                    event = "migration_failed",
                    table,
                    migration = %label,
                    error = %err,
                    "migration failed"
                );
                failures.push(MigrationFailure {
                    migration: label,
                    error: err.to_string(),
                });
            }
        }
    }
    failures
}
