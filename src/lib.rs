//! `city-splitter` partitions one large hotel CSV into one smaller CSV per city, so every file
//! stays under a hosting size limit, and writes an `index.json` describing the partition.
//!
//! The primary entrypoint is [`pipeline::split_by_key`], driven by a [`pipeline::SplitConfig`].
//!
//! ## What a run does
//!
//! - Reads the input CSV. The first header whose name contains `city` (case-insensitive) is the
//!   group key column.
//! - Groups data rows by the trimmed key. Rows too short to have the key column, or whose key is
//!   blank, are skipped and counted.
//! - Writes `<sanitized-key>.csv` per group: the original header followed by the group's rows in
//!   input order.
//! - Writes `index.json` with per-key filename, row count and size, plus totals and the header.
//! - Lists files larger than the size limit (90 MB by default). This is a warning, not a failure.
//!
//! ## Quick example
//!
//! ```no_run
//! use city_splitter::observability::TracingObserver;
//! use city_splitter::pipeline::{SplitConfig, split_by_key};
//!
//! # fn main() -> Result<(), city_splitter::SplitError> {
//! let config = SplitConfig::new("hotels.csv", "data/hotels");
//! let summary = split_by_key(&config, &TracingObserver)?;
//! for entry in &summary.oversize.entries {
//!     println!("{} is {:.2} MB", entry.key, entry.size_mb);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Filenames
//!
//! ```rust
//! use city_splitter::output::output_filename;
//!
//! assert_eq!(output_filename("São Paulo / Zone 5"), "s_o-paulo-_-zone-5.csv");
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: reading the CSV and grouping rows
//! - [`output`]: filename planning, group file writer, index, oversize report
//! - [`pipeline`]: configuration and the end-to-end run
//! - [`observability`]: observer hooks (tracing-backed by default)
//! - [`types`]: grouped data model
//! - [`error`]: error type shared by every phase

pub mod error;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod types;

pub use error::{SplitError, SplitResult};
