//! Column pruning.

use crate::error::{SchemaError, SchemaResult};
use crate::models::RecordTable;
use crate::validation::missing_columns;

/// Remove exactly the named columns, including repeats of a name.
///
/// Strict: if any name is not in the schema the table is left untouched and
/// [`SchemaError::MissingColumns`] lists the absent names. Row count never
/// changes.
pub fn drop_columns(table: &mut RecordTable, names: &[&str]) -> SchemaResult<()> {
    let missing = missing_columns(table.columns(), names);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    let positions: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| names.contains(&c.as_str()))
        .map(|(i, _)| i)
        .collect();
    table.remove_columns_at(&positions);

    Ok(())
}
