//! Pipeline configuration.
//!
//! Defaults match the SBIR.gov "award data without abstracts" export.
//! Callers pass a [`PipelineOptions`] value to the pipeline; nothing is read
//! from globals.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "award_data_no_abstract_processed.csv";

/// Columns removed from the award data before filtering.
pub const DROPPED_COLUMNS: [&str; 4] = [
    "Duns",
    "HUBZone Owned",
    "Socially and Economically Disadvantaged",
    "Women Owned",
];

pub const PROGRAM_COLUMN: &str = "Program";
pub const STATE_COLUMN: &str = "State";
pub const ZIP_COLUMN: &str = "Zip";

/// Derived 5-digit base column.
pub const ZIP_BASE_COLUMN: &str = "Zip1";
/// Derived +4 suffix column.
pub const ZIP_SUFFIX_COLUMN: &str = "Zip2";

pub const DEFAULT_PROGRAM: &str = "SBIR";
pub const DEFAULT_STATE: &str = "CA";

/// Environment variables read by the CLI (also from `.env`).
pub const ENV_INPUT: &str = "SBIR_INPUT";
pub const ENV_MIN_ZIP: &str = "SBIR_MIN_ZIP";
pub const ENV_MAX_ZIP: &str = "SBIR_MAX_ZIP";
pub const ENV_OUTPUT: &str = "SBIR_OUTPUT";

/// Inclusive ZIP bounds, compared as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipRange {
    pub min: String,
    pub max: String,
}

impl ZipRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Lexicographic containment. `"9003"` is below `"92000"`; no padding
    /// or numeric conversion happens.
    pub fn contains(&self, zip: &str) -> bool {
        self.min.as_str() <= zip && zip <= self.max.as_str()
    }
}

/// Row filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub program: String,
    pub state: String,
    pub zip_range: ZipRange,
}

impl FilterCriteria {
    /// SBIR awards in California within the given ZIP range.
    pub fn new(zip_range: ZipRange) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            state: DEFAULT_STATE.to_string(),
            zip_range,
        }
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Input CSV path
    pub input: PathBuf,

    /// Output CSV path (overwritten)
    pub output: PathBuf,

    /// Row filter
    pub criteria: FilterCriteria,

    /// Force a delimiter instead of detecting it
    pub delimiter: Option<char>,
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>, zip_range: ZipRange) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            criteria: FilterCriteria::new(zip_range),
            delimiter: None,
        }
    }

    /// Every column the pipeline reads or drops.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut cols = DROPPED_COLUMNS.to_vec();
        cols.extend([PROGRAM_COLUMN, STATE_COLUMN, ZIP_COLUMN]);
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = PipelineOptions::new("in.csv", ZipRange::new("92000", "92200"));
        assert_eq!(opts.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(opts.criteria.program, "SBIR");
        assert_eq!(opts.criteria.state, "CA");
        assert!(opts.delimiter.is_none());
        assert_eq!(opts.required_columns().len(), 7);
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = ZipRange::new("92000", "92200");
        assert!(range.contains("92000"));
        assert!(range.contains("92200"));
        assert!(range.contains("92128"));
        assert!(!range.contains("92300"));
    }

    #[test]
    fn test_range_compares_strings_not_numbers() {
        // Shorter values sort by character, not magnitude.
        let range = ZipRange::new("9000", "92021");
        assert!(range.contains("9003"));
        assert!(!ZipRange::new("92000", "92200").contains("9003"));
        assert!(ZipRange::new("92000", "92200").contains("921"));
    }
}
