//! Pipeline entry point.
//!
//! [`split_by_key`] runs the phases strictly in order:
//!
//! 1. read the input and group rows by key
//! 2. plan filenames and write one file per group
//! 3. build and write `index.json`
//! 4. check file sizes against the configured limit
//!
//! The first error stops the run. Files already written by earlier groups stay on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, info_span};

use crate::error::SplitResult;
use crate::ingestion::csv::{
    DEFAULT_KEY_MARKER, DEFAULT_PROGRESS_INTERVAL, GroupingOptions, group_csv_from_path,
};
use crate::observability::{SplitObserver, SplitSeverity};
use crate::output::{
    CityIndex, CollisionPolicy, DEFAULT_MAX_FILE_SIZE_MB, OversizeReport, plan_output_files,
    write_groups, write_index,
};
use crate::types::{GroupStats, OutputFile};

/// Default location of the source CSV.
pub const DEFAULT_INPUT_PATH: &str = "src/assets/E342B777-64FD-4A49-9C9F-FEF4BA635863_EN.csv";

/// Default destination directory.
pub const DEFAULT_OUTPUT_DIR: &str = "src/assets/data/hotels";

/// Configuration for a split run.
///
/// Use [`Default`] for the standard hotel dataset layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    /// Source CSV file.
    pub input_path: PathBuf,
    /// Directory receiving the group files and the index. Created if missing.
    pub output_dir: PathBuf,
    /// Files larger than this many MB are listed in the oversize report.
    pub max_file_size_mb: f64,
    /// Substring (case-insensitive) identifying the key column.
    pub key_column_marker: String,
    /// Grouped rows between progress events; `0` disables them.
    pub progress_interval: usize,
    /// Behavior when two keys sanitize to the same filename.
    pub collision_policy: CollisionPolicy,
    /// Write group files on the rayon pool.
    pub parallel_writes: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            key_column_marker: DEFAULT_KEY_MARKER.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            collision_policy: CollisionPolicy::default(),
            parallel_writes: false,
        }
    }
}

impl SplitConfig {
    /// Config reading `input_path` and writing into `output_dir`, other fields defaulted.
    pub fn new(input_path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    fn grouping_options(&self) -> GroupingOptions {
        GroupingOptions {
            key_column_marker: self.key_column_marker.clone(),
            progress_interval: self.progress_interval,
        }
    }
}

/// Outcome of a successful run.
#[derive(Clone, PartialEq)]
pub struct SplitSummary {
    /// Read and skip counters.
    pub stats: GroupStats,
    /// One descriptor per written group file, in write order.
    pub files: Vec<OutputFile>,
    /// Location of `index.json`.
    pub index_path: PathBuf,
    /// Files above the size limit. Advisory only.
    pub oversize: OversizeReport,
}

impl SplitSummary {
    /// Total data rows written across all group files.
    pub fn rows_written(&self) -> usize {
        self.files.iter().map(|f| f.row_count).sum()
    }
}

impl fmt::Debug for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitSummary")
            .field("stats", &self.stats)
            .field("files_len", &self.files.len())
            .field("index_path", &self.index_path)
            .field("oversize_len", &self.oversize.entries.len())
            .finish()
    }
}

/// Split `config.input_path` into one CSV per key under `config.output_dir`.
///
/// Failures are reported to `observer` via `on_failure` before being returned.
///
/// ```no_run
/// use city_splitter::observability::TracingObserver;
/// use city_splitter::pipeline::{SplitConfig, split_by_key};
///
/// # fn main() -> Result<(), city_splitter::SplitError> {
/// let config = SplitConfig {
///     max_file_size_mb: 50.0,
///     ..SplitConfig::new("hotels.csv", "out/hotels")
/// };
/// let summary = split_by_key(&config, &TracingObserver)?;
/// println!("files={} rows={}", summary.files.len(), summary.rows_written());
/// # Ok(())
/// # }
/// ```
pub fn split_by_key(
    config: &SplitConfig,
    observer: &dyn SplitObserver,
) -> SplitResult<SplitSummary> {
    let result = run_phases(config, observer);
    if let Err(e) = &result {
        observer.on_failure(SplitSeverity::for_error(e), e);
    }
    result
}

fn run_phases(config: &SplitConfig, observer: &dyn SplitObserver) -> SplitResult<SplitSummary> {
    let dataset = {
        let _span = info_span!("read_and_group", input = %config.input_path.display()).entered();
        info!("reading {}", config.input_path.display());
        let ds = group_csv_from_path(&config.input_path, &config.grouping_options(), observer)?;
        info!(
            rows = ds.stats.rows_grouped,
            groups = ds.groups.len(),
            skipped_short = ds.stats.skipped_short,
            skipped_empty_key = ds.stats.skipped_empty_key,
            "grouped {} rows into {} groups",
            ds.stats.rows_grouped,
            ds.groups.len()
        );
        ds
    };

    let files = {
        let _span = info_span!("write_groups", output = %config.output_dir.display()).entered();
        let plan = plan_output_files(&dataset.groups, config.collision_policy, observer)?;
        write_groups(
            &config.output_dir,
            &dataset.headers,
            &plan,
            config.parallel_writes,
            observer,
        )?
    };

    let index_path = {
        let _span = info_span!("build_index").entered();
        let index = CityIndex::from_files(&files, &dataset.headers);
        let path = write_index(&config.output_dir, &index)?;
        observer.on_index_written(&path, index.total_cities, index.total_hotels);
        path
    };

    let oversize = OversizeReport::from_files(&files, config.max_file_size_mb);
    observer.on_oversize(&oversize);

    Ok(SplitSummary {
        stats: dataset.stats,
        files,
        index_path,
        oversize,
    })
}
