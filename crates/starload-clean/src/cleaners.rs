//! Record cleaners: one pass per entity over a raw batch.
//!
//! A pass reshapes columns first, then normalizes every schema column of every
//! row against the raw row values, then applies the entity's row-drop rule.

use std::time::Instant;

use starload_core::{Batch, Entity, FieldSpec, Reshape};
use tracing::{info, warn};

use crate::normalizers::{normalize, RowContext};
use crate::report::CleanReport;

/// Cleaned batch plus the report of the pass that produced it.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub batch: Batch,
    pub report: CleanReport,
}

/// Clean a raw batch of `entity` records.
pub fn clean(entity: Entity, raw: Batch) -> CleanOutput {
    let start = Instant::now();
    let schema = entity.schema();
    let batch = reshape(raw, schema.reshape);
    let mut report = CleanReport::new(entity, batch.len());

    let plan: Vec<Option<&FieldSpec>> = batch
        .columns()
        .iter()
        .map(|column| schema.field(column))
        .collect();
    let drop_index = schema
        .drop_on
        .and_then(|field| batch.column_index(field).map(|index| (field, index)));

    let batch = batch.rewrite_rows(|position, columns, row| {
        let raw_row = row.to_vec();
        let ctx = RowContext::new(columns, &raw_row);

        for ((cell, raw), spec) in row.iter_mut().zip(&raw_row).zip(&plan) {
            let Some(spec) = spec else {
                continue;
            };
            let cleaned = normalize(&spec.field_type, raw, &ctx);
            report.record_normalizer_usage(spec.field_type.id());
            if let Some(fallback) = cleaned.fallback {
                report.record_fallback(fallback);
            }
            if cleaned.value.is_null() && !raw.is_null() {
                report.record_nulled(spec.name);
            }
            *cell = cleaned.value;
        }

        match drop_index {
            Some((field, index)) if row[index].is_null() => {
                warn!(
                    event = "row_dropped",
                    entity = %entity,
                    position,
                    required_field = field,
                    raw = %raw_row[index].to_csv(),
                    "required field cleaned to null"
                );
                report.record_dropped(position, field);
                false
            }
            _ => true,
        }
    });

    report.rows_out = batch.len();
    info!(
        event = "batch_cleaned",
        entity = %entity,
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        rows_dropped = report.rows_dropped(),
        regenerated_uuids = report.regenerated_uuids,
        sentinel_dates = report.sentinel_dates,
        duration_ms = start.elapsed().as_millis() as u64,
        "batch cleaned"
    );

    CleanOutput { batch, report }
}

fn reshape(batch: Batch, steps: &[Reshape]) -> Batch {
    steps.iter().fold(batch, |batch, step| match step {
        Reshape::Drop { column } => batch.drop_columns(&[*column]),
        Reshape::Rename { from, to } => batch.rename_column(from, to),
        Reshape::MoveBefore { column, anchor } => batch.move_column_before(column, anchor),
        Reshape::EnsureIndex => batch.with_index_column(),
    })
}

pub fn clean_users(raw: Batch) -> Batch {
    clean(Entity::Users, raw).batch
}

pub fn clean_cards(raw: Batch) -> Batch {
    clean(Entity::Cards, raw).batch
}

pub fn clean_stores(raw: Batch) -> Batch {
    clean(Entity::Stores, raw).batch
}

pub fn clean_products(raw: Batch) -> Batch {
    clean(Entity::Products, raw).batch
}

pub fn clean_orders(raw: Batch) -> Batch {
    clean(Entity::Orders, raw).batch
}

pub fn clean_date_times(raw: Batch) -> Batch {
    clean(Entity::DateTimes, raw).batch
}
