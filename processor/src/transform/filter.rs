//! Row filtering by program, state and ZIP range.
//!
//! ```text
//! Program == program ─▶ State == state ─▶ split Zip into Zip1/Zip2 ─▶ min <= Zip1 <= max
//! ```
//!
//! ZIP bounds are compared as strings, so a 4-character `Zip1` such as
//! `"9003"` sorts before `"92021"`. Values are never padded or parsed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::config::{
    FilterCriteria, ZipRange, PROGRAM_COLUMN, STATE_COLUMN, ZIP_BASE_COLUMN, ZIP_COLUMN,
    ZIP_SUFFIX_COLUMN,
};
use crate::error::{SchemaError, SchemaResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::{cell_text, RecordTable, ZipParts};

static FIVE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").expect("valid regex"));

/// Rows remaining after each filter step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub input_rows: usize,
    pub after_program: usize,
    pub after_state: usize,
    pub after_zip: usize,
}

/// Keep rows whose `column` holds exactly `expected`. `Null` never matches.
pub fn retain_equal(table: &mut RecordTable, column: &str, expected: &str) -> SchemaResult<()> {
    let idx = column_or_err(table, column)?;
    table.retain(|r| matches!(&r.values[idx], Value::String(s) if s == expected));
    Ok(())
}

/// Split `Zip` on its first hyphen into `Zip1` and `Zip2` columns.
///
/// A value without a hyphen gives the whole value in `Zip1` and `Null` in
/// `Zip2`. A `Null` zip gives `Null` in both.
pub fn split_zip_column(table: &mut RecordTable) -> SchemaResult<()> {
    let idx = column_or_err(table, ZIP_COLUMN)?;

    let (bases, suffixes): (Vec<Value>, Vec<Value>) = table
        .rows()
        .iter()
        .map(|r| match cell_text(&r.values[idx]) {
            Some(zip) => {
                let parts = ZipParts::split(&zip);
                (
                    Value::String(parts.base),
                    parts.suffix.map(Value::String).unwrap_or(Value::Null),
                )
            }
            None => (Value::Null, Value::Null),
        })
        .unzip();

    // One value per row, so neither call can be rejected.
    let based = table.set_column(ZIP_BASE_COLUMN, bases);
    debug_assert!(based);
    let suffixed = table.set_column(ZIP_SUFFIX_COLUMN, suffixes);
    debug_assert!(suffixed);
    Ok(())
}

/// Keep rows whose `Zip1` lies within `range` (inclusive, string order).
pub fn retain_zip_range(table: &mut RecordTable, range: &ZipRange) -> SchemaResult<()> {
    let idx = column_or_err(table, ZIP_BASE_COLUMN)?;
    table.retain(|r| matches!(&r.values[idx], Value::String(zip) if range.contains(zip)));
    Ok(())
}

/// Warn about bounds that will compare surprisingly. Nothing is rejected.
pub fn check_zip_bounds(range: &ZipRange) -> Vec<String> {
    let mut warnings = Vec::new();
    for (label, bound) in [("Minimum", &range.min), ("Maximum", &range.max)] {
        if !FIVE_DIGITS.is_match(bound) {
            warnings.push(format!(
                "{} ZIP '{}' is not 5 digits; it is compared as text",
                label, bound
            ));
        }
    }
    if range.min > range.max {
        warnings.push(format!(
            "Minimum ZIP '{}' is above maximum ZIP '{}'; no rows can match",
            range.min, range.max
        ));
    }
    warnings
}

/// Apply every filter step in order.
pub fn filter_records(
    table: &mut RecordTable,
    criteria: &FilterCriteria,
) -> SchemaResult<FilterStats> {
    let mut stats = FilterStats {
        input_rows: table.len(),
        ..Default::default()
    };

    for warning in check_zip_bounds(&criteria.zip_range) {
        log_warning(warning);
    }

    log_info(format!("Keeping {} == \"{}\"", PROGRAM_COLUMN, criteria.program));
    retain_equal(table, PROGRAM_COLUMN, &criteria.program)?;
    stats.after_program = table.len();
    log_success(format!("{} rows", stats.after_program));

    log_info(format!("Keeping {} == \"{}\"", STATE_COLUMN, criteria.state));
    retain_equal(table, STATE_COLUMN, &criteria.state)?;
    stats.after_state = table.len();
    log_success(format!("{} rows", stats.after_state));

    split_zip_column(table)?;

    log_info(format!(
        "Keeping \"{}\" <= {} <= \"{}\"",
        criteria.zip_range.min, ZIP_BASE_COLUMN, criteria.zip_range.max
    ));
    retain_zip_range(table, &criteria.zip_range)?;
    stats.after_zip = table.len();
    log_success(format!("{} rows", stats.after_zip));

    Ok(stats)
}

fn column_or_err(table: &RecordTable, column: &str) -> SchemaResult<usize> {
    table
        .column_index(column)
        .ok_or_else(|| SchemaError::MissingColumns(vec![column.to_string()]))
}
