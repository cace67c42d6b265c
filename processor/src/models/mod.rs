//! Domain models for the award filtering pipeline.
//!
//! - [`RecordTable`] - the in-memory table, loaded once and mutated in place
//! - [`Record`] - one award row with its original row label
//! - [`ZipParts`] - a `Zip` value split into base and +4 suffix

use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Record
// =============================================================================

/// One row of the table.
///
/// `label` is the 0-based position of the row in the input file. It
/// survives filtering and is written out as the leading index column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub label: usize,
    pub values: Vec<Value>,
}

impl Record {
    pub fn new(label: usize, values: Vec<Value>) -> Self {
        Self { label, values }
    }
}

// =============================================================================
// Record Table
// =============================================================================

/// Ordered columns plus ordered rows. Every row has exactly one cell per
/// column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl RecordTable {
    /// Build a table, padding short rows with `Null` and truncating long
    /// ones so that the width invariant holds.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.values.resize(width, Value::Null);
                r
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `name`, if both exist.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r.values[idx])
    }

    /// Remove the columns at the given positions. Positions must be valid.
    pub(crate) fn remove_columns_at(&mut self, positions: &[usize]) {
        let mut positions = positions.to_vec();
        positions.sort_unstable();
        positions.dedup();

        for &idx in positions.iter().rev() {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.values.remove(idx);
            }
        }
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Record) -> bool,
    {
        self.rows.retain(|r| keep(r));
    }

    /// Set a column from one value per row. An existing column of the same
    /// name is overwritten in place; otherwise the column is appended.
    ///
    /// Returns `false` (and changes nothing) if `values` does not have one
    /// entry per row.
    #[must_use]
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> bool {
        if values.len() != self.rows.len() {
            return false;
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.values[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.values.push(value);
                }
            }
        }
        true
    }
}

// =============================================================================
// ZIP Parts
// =============================================================================

/// A `Zip` value split on its first hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipParts {
    /// Text before the first hyphen, or the whole value.
    pub base: String,
    /// Text after the first hyphen; `None` when there is no hyphen.
    pub suffix: Option<String>,
}

impl ZipParts {
    pub fn split(zip: &str) -> Self {
        match zip.split_once('-') {
            Some((base, suffix)) => Self {
                base: base.to_string(),
                suffix: Some(suffix.to_string()),
            },
            None => Self {
                base: zip.to_string(),
                suffix: None,
            },
        }
    }
}

/// Text view of a cell. `Null` has none.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
