use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::value::CellValue;

/// Name of the positional row index column carried through every load.
pub const INDEX_COLUMN: &str = "index";

/// An ordered table of rows sharing one set of named columns.
///
/// Every row holds exactly one cell per column. Reshaping methods consume the
/// batch and return the reshaped one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Batch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut batch = Self::new(columns);
        for row in rows {
            batch.push_row(row)?;
        }
        Ok(batch)
    }

    /// Build a batch from an array of JSON objects.
    ///
    /// Columns are the union of keys in first-seen order; a record missing a
    /// key gets `Null` in that column.
    pub fn from_json_records(records: &[Value]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        for (position, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                Error::InvalidBatch(format!("record {position} is not a JSON object"))
            })?;
            for key in object.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).map(CellValue::from_json).unwrap_or(CellValue::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Build a batch from a column-oriented JSON object
    /// (`{"column": {"0": value, "1": value}}`).
    ///
    /// Row keys are sorted numerically when they parse as integers.
    pub fn from_json_columns(object: &Map<String, Value>) -> Result<Self> {
        let mut row_keys: Vec<String> = Vec::new();
        for (column, cells) in object {
            let cells = cells.as_object().ok_or_else(|| {
                Error::InvalidBatch(format!("column '{column}' is not a JSON object"))
            })?;
            for key in cells.keys() {
                if !row_keys.contains(key) {
                    row_keys.push(key.clone());
                }
            }
        }
        row_keys.sort_by_key(|key| (key.parse::<u64>().unwrap_or(u64::MAX), key.clone()));

        let columns: Vec<String> = object.keys().cloned().collect();
        let rows = row_keys
            .iter()
            .map(|row_key| {
                columns
                    .iter()
                    .map(|column| {
                        object
                            .get(column)
                            .and_then(|cells| cells.get(row_key))
                            .map(CellValue::from_json)
                            .unwrap_or(CellValue::Null)
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::InvalidBatch(format!(
                "row has {} cells but batch has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(index))
    }

    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let index = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|index| row.get(index)))
    }

    /// Remove the named columns; names that are not present are ignored.
    pub fn drop_columns(self, names: &[&str]) -> Self {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|column| !names.contains(&column.as_str()))
            .collect();
        let columns = self
            .columns
            .into_iter()
            .zip(&keep)
            .filter_map(|(column, keep)| keep.then_some(column))
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&keep)
                    .filter_map(|(cell, keep)| keep.then_some(cell))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn rename_column(mut self, from: &str, to: &str) -> Self {
        if let Some(index) = self.column_index(from) {
            self.columns[index] = to.to_string();
        }
        self
    }

    /// Move `column` so it sits directly in front of `anchor`.
    ///
    /// Leaves the batch untouched when either column is missing.
    pub fn move_column_before(mut self, column: &str, anchor: &str) -> Self {
        let (Some(from), Some(_)) = (self.column_index(column), self.column_index(anchor)) else {
            return self;
        };
        let name = self.columns.remove(from);
        let cells: Vec<CellValue> = self.rows.iter_mut().map(|row| row.remove(from)).collect();

        let to = self.column_index(anchor).unwrap_or(self.columns.len());
        self.columns.insert(to, name);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.insert(to, cell);
        }
        self
    }

    /// Make sure the batch starts with a positional `index` column.
    pub fn with_index_column(mut self) -> Self {
        if self.has_column(INDEX_COLUMN) {
            return self;
        }
        self.columns.insert(0, INDEX_COLUMN.to_string());
        for (position, row) in self.rows.iter_mut().enumerate() {
            row.insert(0, CellValue::Int(position as i64));
        }
        self
    }

    /// Rewrite each row in place and keep the rows for which `f` returns true.
    ///
    /// `f` receives the row position in the input batch and the column names.
    pub fn rewrite_rows(
        mut self,
        mut f: impl FnMut(usize, &[String], &mut [CellValue]) -> bool,
    ) -> Self {
        let columns = &self.columns;
        let mut position = 0;
        self.rows.retain_mut(|row| {
            let keep = f(position, columns.as_slice(), row.as_mut_slice());
            position += 1;
            keep
        });
        self
    }
}
