//! High-level pipeline API: load, validate, prune, filter, export.
//!
//! # Example
//!
//! ```rust,ignore
//! use sbir_proc::{run_pipeline, PipelineOptions, ZipRange};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = PipelineOptions::new(
//!         "award_data_no_abstract.csv",
//!         ZipRange::new("92021", "92129"),
//!     );
//!     let report = run_pipeline(&options)?;
//!     println!("{} awards kept", report.stats.after_zip);
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use serde::Serialize;

use super::filter::{filter_records, FilterStats};
use super::prune::drop_columns;
use crate::config::{FilterCriteria, PipelineOptions, DROPPED_COLUMNS};
use crate::error::{PipelineResult, SchemaResult};
use crate::export::export_table;
use crate::logs::{log_info, log_info_indent, log_success};
use crate::models::RecordTable;
use crate::parser::load_file;
use crate::validation::require_columns;

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Where the processed CSV was written
    pub output: PathBuf,

    /// Encoding used to decode the input
    pub encoding: String,

    /// Delimiter used to split the input
    pub delimiter: char,

    /// Rows remaining after each filter step
    pub stats: FilterStats,

    /// Columns in the written file, without the index column
    pub columns: Vec<String>,
}

/// Validate, prune and filter a loaded table in memory.
///
/// Column presence is checked before anything changes, so a failure leaves
/// the table as it was loaded.
pub fn process_table(
    table: &mut RecordTable,
    criteria: &FilterCriteria,
    required: &[&str],
) -> SchemaResult<FilterStats> {
    require_columns(table, required)?;

    log_info(format!("🧹 Dropping {} columns...", DROPPED_COLUMNS.len()));
    drop_columns(table, &DROPPED_COLUMNS)?;
    for name in DROPPED_COLUMNS {
        log_info_indent(name, 1);
    }

    log_info("🔎 Filtering rows...");
    filter_records(table, criteria)
}

/// Run the whole pipeline for `options`.
///
/// Any error aborts the run before the output file is created.
pub fn run_pipeline(options: &PipelineOptions) -> PipelineResult<PipelineReport> {
    log_info(format!("📖 Reading {}...", options.input.display()));
    let loaded = load_file(&options.input, options.delimiter)?;
    log_success(format!("Detected encoding: {}", loaded.encoding));
    log_success(format!("Delimiter: '{}'", format_delimiter(loaded.delimiter)));
    log_success(format!(
        "Read {} rows, {} columns",
        loaded.table.len(),
        loaded.table.columns().len()
    ));

    let mut table = loaded.table;
    let stats = process_table(&mut table, &options.criteria, &options.required_columns())?;

    log_info(format!("💾 Writing {}...", options.output.display()));
    let output = export_table(&table, &options.output)?;
    log_success(format!("Wrote {} rows", table.len()));

    Ok(PipelineReport {
        output,
        encoding: loaded.encoding,
        delimiter: loaded.delimiter,
        stats,
        columns: table.columns().to_vec(),
    })
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
