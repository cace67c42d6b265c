//! Error types for the award filtering pipeline.
//!
//! - [`LoadError`] - reading and parsing the input CSV
//! - [`SchemaError`] - required columns missing from the input
//! - [`ExportError`] - writing the processed CSV
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Lower-level errors convert into [`PipelineError`] through `From`,
//! so `?` works across stage boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while loading the input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content could not be decoded to text.
    #[error("Failed to decode content as {0}")]
    Encoding(String),

    /// A row is not well-formed delimited text.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Zero bytes of input.
    #[error("CSV file is empty")]
    EmptyFile,

    /// The header row is missing or blank.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Schema Errors
// =============================================================================

/// The input does not carry the columns the pipeline works on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// One or more required columns are absent.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the processed file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Temporary file creation or flush failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("Failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    /// The finished file could not be moved into place.
    #[error("Failed to persist output to {}: {message}", .path.display())]
    Persist { path: PathBuf, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type LoadResult<T> = Result<T, LoadError>;

pub type SchemaResult<T> = Result<T, SchemaError>;

pub type ExportResult<T> = Result<T, ExportError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
