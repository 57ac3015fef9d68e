use serde::Serialize;
use starload_core::{hinted_type, Batch, CellValue, ColumnHint, SqlType};

/// Warehouse type chosen for one batch column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnType {
    pub name: String,
    pub sql_type: SqlType,
}

/// Infer a column type from its cells.
///
/// Integers widen to floats when both appear; any other mix, and an all-null
/// column, is text.
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> SqlType {
    let mut inferred: Option<SqlType> = None;
    for cell in cells {
        let kind = match cell {
            CellValue::Null => continue,
            CellValue::Int(_) => SqlType::BigInt,
            CellValue::Float(_) => SqlType::Float,
            CellValue::Date(_) => SqlType::Date,
            CellValue::Bool(_) => SqlType::Boolean,
            CellValue::Text(_) | CellValue::Uuid(_) => SqlType::Text,
        };
        inferred = Some(match (inferred, kind) {
            (None, kind) => kind,
            (Some(current), kind) if current == kind => current,
            (Some(SqlType::BigInt), SqlType::Float) | (Some(SqlType::Float), SqlType::BigInt) => {
                SqlType::Float
            }
            _ => return SqlType::Text,
        });
    }
    inferred.unwrap_or(SqlType::Text)
}

/// Column types for a batch: the hint when one names the column, otherwise
/// the type inferred from the cells.
pub fn resolve_column_types(batch: &Batch, hints: &[ColumnHint]) -> Vec<ColumnType> {
    batch
        .columns()
        .iter()
        .map(|name| ColumnType {
            name: name.clone(),
            sql_type: hinted_type(hints, name)
                .unwrap_or_else(|| infer_column_type(batch.column_values(name))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_numbers_widen_to_float() {
        let cells = [CellValue::Int(1), CellValue::Null, CellValue::Float(1.5)];
        assert_eq!(infer_column_type(&cells), SqlType::Float);
    }

    #[test]
    fn uuids_and_mixed_kinds_are_text() {
        assert_eq!(
            infer_column_type(&[CellValue::Uuid("93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8".into())]),
            SqlType::Text
        );
        assert_eq!(
            infer_column_type(&[CellValue::Int(1), CellValue::Bool(true)]),
            SqlType::Text
        );
        assert_eq!(infer_column_type(&[CellValue::Null]), SqlType::Text);
    }

    #[test]
    fn hints_win_over_inference() {
        let batch = Batch::from_rows(
            vec!["index".into(), "card_number".into()],
            vec![vec![CellValue::Int(0), CellValue::Int(4252720361802860591)]],
        )
        .expect("batch");
        let types = resolve_column_types(
            &batch,
            &[ColumnHint::new("card_number", SqlType::Varchar(20))],
        );
        assert_eq!(types[0].sql_type, SqlType::BigInt);
        assert_eq!(types[1].sql_type, SqlType::Varchar(20));
    }
}
