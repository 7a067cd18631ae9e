//! Reading the input CSV and grouping its rows by key.
//!
//! Most callers go through [`crate::pipeline::split_by_key`]; the functions in [`csv`] are
//! exposed for callers that want the grouped rows without writing anything.

pub mod csv;

pub use self::csv::{
    GroupingOptions, group_csv_from_path, group_csv_from_reader, locate_key_column,
};
