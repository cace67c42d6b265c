//! Column presence checks.
//!
//! The pipeline looks up `Program`, `State` and `Zip` and drops four more
//! columns. All of them are checked up front so a bad file fails once,
//! naming every missing column, before anything is transformed.

use crate::error::{SchemaError, SchemaResult};
use crate::models::RecordTable;

/// Names from `required` that are absent from `columns`, in request order.
pub fn missing_columns(columns: &[String], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !columns.iter().any(|c| c == *name))
        .map(|name| name.to_string())
        .collect()
}

/// Fail with [`SchemaError::MissingColumns`] unless every required column
/// is in the table's schema.
///
/// # Example
/// ```ignore
/// use sbir_proc::validation::require_columns;
///
/// require_columns(&table, &["Program", "State", "Zip"])?;
/// ```
pub fn require_columns(table: &RecordTable, required: &[&str]) -> SchemaResult<()> {
    let missing = missing_columns(table.columns(), required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}
