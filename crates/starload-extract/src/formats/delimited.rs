use csv::ReaderBuilder;
use starload_core::{Batch, CellValue, INDEX_COLUMN};

use crate::error::ExtractError;

/// Parse a CSV payload into a raw batch.
///
/// An unnamed first header is the positional index written by the export and
/// becomes the `index` column (integer cells). Empty cells become null, every
/// other cell is text.
pub fn parse_csv_batch(bytes: &[u8]) -> Result<Batch, ExtractError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let mut columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let indexed = match columns.first_mut() {
        Some(first) if first.trim().is_empty() => {
            *first = INDEX_COLUMN.to_string();
            true
        }
        _ => false,
    };

    let mut batch = Batch::new(columns);
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(position, cell)| match cell {
                "" => CellValue::Null,
                cell if indexed && position == 0 => cell
                    .parse::<i64>()
                    .map(CellValue::Int)
                    .unwrap_or_else(|_| CellValue::text(cell)),
                cell => CellValue::text(cell),
            })
            .collect();
        batch.push_row(row)?;
    }
    Ok(batch)
}
