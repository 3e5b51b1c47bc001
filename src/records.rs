//! The in-memory record table shared by every pipeline stage.
//!
//! A [`RecordTable`] is an ordered list of column names plus rows whose cells
//! line up with those columns. Stages never mutate a table they were handed;
//! each one builds and returns a new value.

use serde::Serialize;

use crate::data::Value;

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RecordTable {
    /// Builds a table, padding short rows with nulls and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor for text-only tables; empty strings become null.
    pub fn from_text<S: AsRef<str>>(columns: &[S], rows: &[Vec<&str>]) -> Self {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| Value::from(*cell)))
                    .collect()
            })
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Every cell of one column, in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(column).and_then(|v| v.as_ref()))
    }

    /// A new table with the same columns and only the rows accepted by `keep`.
    pub fn retain_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// A new table where one column's cells have been rewritten by `f`.
    pub fn map_column<F>(&self, column: usize, mut f: F) -> Self
    where
        F: FnMut(Option<&Value>) -> Option<Value>,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if let Some(cell) = row.get_mut(column) {
                    *cell = f(cell.as_ref());
                }
                row
            })
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
