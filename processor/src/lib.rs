//! # sbir-proc - SBIR.gov award data filter
//!
//! Reads the SBIR.gov "award data without abstracts" CSV, drops columns
//! that are not needed, keeps SBIR awards in California within a ZIP range
//! and writes the result to a new CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Award CSV  │────▶│   Loader    │────▶│ Prune+Filter│────▶│  Exporter   │
//! │  (any enc.) │     │  (auto-enc) │     │ (Zip1/Zip2) │     │ (index col) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sbir_proc::{run_pipeline, PipelineOptions, ZipRange};
//!
//! let options = PipelineOptions::new("award_data_no_abstract.csv", ZipRange::new("92021", "92129"));
//! let report = run_pipeline(&options).unwrap();
//! println!("Kept {} awards", report.stats.after_zip);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`config`] - Defaults and pipeline options
//! - [`models`] - Record table and ZIP parts
//! - [`parser`] - CSV loading with auto-detection
//! - [`validation`] - Required column checks
//! - [`transform`] - Pruning, filtering and the pipeline
//! - [`export`] - Atomic CSV export
//! - [`logs`] - Progress logging

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Loading
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Export
pub mod export;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ExportError, LoadError, PipelineError, SchemaError};

// =============================================================================
// Re-exports - Configuration and models
// =============================================================================

pub use config::{FilterCriteria, PipelineOptions, ZipRange, DEFAULT_OUTPUT, DROPPED_COLUMNS};
pub use models::{Record, RecordTable, ZipParts};

// =============================================================================
// Re-exports - Loading, validation, export
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, load_bytes, load_file, parse_table,
    LoadedTable,
};
pub use export::{export_table, AtomicCsvWriter};
pub use validation::{missing_columns, require_columns};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{process_table, run_pipeline, PipelineReport};
pub use transform::{drop_columns, filter_records, split_zip_column, FilterStats};
