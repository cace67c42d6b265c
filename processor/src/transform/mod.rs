//! Transformation module.
//!
//! - Prune: drop the unwanted award columns
//! - Filter: program, state and ZIP range filters
//! - Pipeline: load, transform and export in one call

pub mod filter;
pub mod pipeline;
pub mod prune;

pub use filter::{filter_records, split_zip_column, FilterStats};
pub use pipeline::*;
pub use prune::drop_columns;
