use serde::Serialize;

use crate::constraints::{Constraint, ForeignKey, PrimaryKey};

/// Declared shape of one warehouse table: known columns plus constraints.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseTable {
    pub name: String,
    pub columns: Vec<String>,
    pub constraints: Vec<Constraint>,
}

impl WarehouseTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.constraints.iter().find_map(|constraint| match constraint {
            Constraint::PrimaryKey(pk) => Some(pk),
            _ => None,
        })
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::ForeignKey(fk) => Some(fk),
            _ => None,
        })
    }
}

/// The star schema as a set of tables and their keys.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WarehouseModel {
    pub tables: Vec<WarehouseTable>,
}

impl WarehouseModel {
    pub fn table(&self, name: &str) -> Option<&WarehouseTable> {
        self.tables.iter().find(|table| table.name == name)
    }
}
