use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starload_core::Entity;

use crate::normalizers::Fallback;

/// A row removed by the entity's row-drop rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Position of the row in the raw batch.
    pub position: usize,
    pub field: String,
}

/// Summary of one cleaning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    pub entity: Entity,
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped_rows: Vec<DroppedRow>,
    /// Non-null input cells that cleaned to null, per column.
    pub nulled_by_column: BTreeMap<String, u64>,
    pub normalizer_usage: BTreeMap<String, u64>,
    pub regenerated_uuids: u64,
    pub sentinel_dates: u64,
}

impl CleanReport {
    pub fn new(entity: Entity, rows_in: usize) -> Self {
        Self {
            entity,
            rows_in,
            rows_out: 0,
            dropped_rows: Vec::new(),
            nulled_by_column: BTreeMap::new(),
            normalizer_usage: BTreeMap::new(),
            regenerated_uuids: 0,
            sentinel_dates: 0,
        }
    }

    pub fn record_normalizer_usage(&mut self, id: &str) {
        *self.normalizer_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn record_nulled(&mut self, column: &str) {
        *self.nulled_by_column.entry(column.to_string()).or_insert(0) += 1;
    }

    pub fn record_fallback(&mut self, fallback: Fallback) {
        match fallback {
            Fallback::RegeneratedUuid => self.regenerated_uuids += 1,
            Fallback::SentinelDate => self.sentinel_dates += 1,
        }
    }

    pub fn record_dropped(&mut self, position: usize, field: &str) {
        self.dropped_rows.push(DroppedRow {
            position,
            field: field.to_string(),
        });
    }

    pub fn rows_dropped(&self) -> usize {
        self.dropped_rows.len()
    }
}
