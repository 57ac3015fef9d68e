//! SQL statement builders for the warehouse.
//!
//! Identifiers are always double-quoted and literals single-quoted, so table
//! and column names coming from source data cannot break out of a statement.

use starload_core::{ColumnHint, ForeignKey, PrimaryKey, SqlType};

use crate::infer::ColumnType;

/// Postgres caps bind parameters per statement at 65535.
pub const MAX_BIND_PARAMS: usize = 65_535;

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(table))
}

pub fn create_table(table: &str, columns: &[ColumnType]) -> String {
    let columns = columns
        .iter()
        .map(|column| format!("{} {}", quote_ident(&column.name), column.sql_type))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({columns})", quote_ident(table))
}

/// Multi-row insert with one text parameter per cell, cast to its column type.
pub fn insert_rows(table: &str, columns: &[ColumnType], rows: usize) -> String {
    let names = columns
        .iter()
        .map(|column| quote_ident(&column.name))
        .collect::<Vec<_>>()
        .join(", ");
    let mut param = 0;
    let tuples = (0..rows)
        .map(|_| {
            let cells = columns
                .iter()
                .map(|column| {
                    param += 1;
                    format!("${param}::{}", column.sql_type)
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("({cells})")
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} ({names}) VALUES {tuples}", quote_ident(table))
}

/// Rows per insert statement that stay under [`MAX_BIND_PARAMS`].
pub fn rows_per_insert(columns: usize) -> usize {
    (MAX_BIND_PARAMS / columns.max(1)).max(1)
}

pub fn alter_column_types(table: &str, hints: &[ColumnHint]) -> String {
    let clauses = hints
        .iter()
        .map(|hint| {
            let column = quote_ident(hint.column);
            format!(
                "ALTER COLUMN {column} TYPE {ty} USING {column}::{ty}",
                ty = hint.sql_type
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("ALTER TABLE {} {clauses}", quote_ident(table))
}

pub fn add_primary_key(key: &PrimaryKey) -> String {
    format!(
        "ALTER TABLE {} ADD PRIMARY KEY ({})",
        quote_ident(&key.table),
        ident_list(&key.columns)
    )
}

/// `ALTER TABLE child ADD CONSTRAINT {parent}_{child}_fk FOREIGN KEY ...`.
pub fn add_foreign_key(key: &ForeignKey) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        quote_ident(&key.child_table),
        quote_ident(&key.constraint_name()),
        ident_list(&key.columns),
        quote_ident(&key.parent_table),
        ident_list(&key.parent_columns)
    )
}

pub fn rename_column(table: &str, from: &str, to: &str) -> String {
    format!(
        "ALTER TABLE IF EXISTS {} RENAME COLUMN {} TO {}",
        quote_ident(table),
        quote_ident(from),
        quote_ident(to)
    )
}

pub fn add_column(table: &str, column: &str, sql_type: SqlType) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {sql_type}",
        quote_ident(table),
        quote_ident(column)
    )
}

/// Set `column` from a SQL expression over the row.
pub fn update_column(table: &str, column: &str, expression: &str) -> String {
    format!(
        "UPDATE {} SET {} = {expression}",
        quote_ident(table),
        quote_ident(column)
    )
}

/// Rewrite a text flag column to `'true'` where it equals `true_value`,
/// `'false'` everywhere else (null included).
pub fn flag_to_boolean(table: &str, column: &str, true_value: &str) -> String {
    let quoted = quote_ident(column);
    update_column(
        table,
        column,
        &format!(
            "CASE WHEN {quoted} = {} THEN 'true' ELSE 'false' END",
            quote_literal(true_value)
        ),
    )
}

pub fn strip_character(table: &str, column: &str, character: &str) -> String {
    update_column(
        table,
        column,
        &format!("REPLACE({}, {}, '')", quote_ident(column), quote_literal(character)),
    )
}

pub const TABLE_EXISTS: &str = "select exists (select 1 from information_schema.tables \
     where table_schema = current_schema() and table_name = $1)";

fn ident_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ")
}
