//! Observer hooks for pipeline progress and outcomes.
//!
//! The pipeline reports to a [`SplitObserver`]. [`TracingObserver`] turns every callback into a
//! structured `tracing` event and is what the CLI uses.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::SplitError;
use crate::output::report::OversizeReport;
use crate::types::OutputFile;

/// Severity classification used for failure callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SplitSeverity {
    /// Error-level event (run failed on bad input or configuration).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

impl SplitSeverity {
    /// Severity of a pipeline error.
    pub fn for_error(e: &SplitError) -> Self {
        match e {
            SplitError::Io(_) => SplitSeverity::Critical,
            SplitError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => SplitSeverity::Critical,
                _ => SplitSeverity::Error,
            },
            SplitError::Json(err) if err.is_io() => SplitSeverity::Critical,
            SplitError::Json(_)
            | SplitError::InputNotFound { .. }
            | SplitError::ColumnNotFound { .. }
            | SplitError::FilenameCollision { .. } => SplitSeverity::Error,
        }
    }
}

/// Observer interface for the split pipeline.
///
/// All methods default to no-ops so implementors only override what they need.
pub trait SplitObserver: Send + Sync {
    /// The key column was located.
    fn on_column_selected(&self, _name: &str, _index: usize) {}

    /// Periodic progress while grouping.
    fn on_progress(&self, _rows: usize, _groups: usize) {}

    /// Two keys mapped to the same filename and the later one was renamed.
    fn on_collision_renamed(&self, _key: &str, _wanted: &str, _assigned: &str) {}

    /// A group file was written and flushed.
    fn on_group_written(&self, _file: &OutputFile) {}

    /// The index document was written.
    fn on_index_written(&self, _path: &Path, _groups: usize, _rows: usize) {}

    /// The oversize check finished. Called even when nothing is oversized.
    fn on_oversize(&self, _report: &OversizeReport) {}

    /// The run failed.
    fn on_failure(&self, _severity: SplitSeverity, _error: &SplitError) {}
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SplitObserver for NoopObserver {}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SplitObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn SplitObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SplitObserver for CompositeObserver {
    fn on_column_selected(&self, name: &str, index: usize) {
        for o in &self.observers {
            o.on_column_selected(name, index);
        }
    }

    fn on_progress(&self, rows: usize, groups: usize) {
        for o in &self.observers {
            o.on_progress(rows, groups);
        }
    }

    fn on_collision_renamed(&self, key: &str, wanted: &str, assigned: &str) {
        for o in &self.observers {
            o.on_collision_renamed(key, wanted, assigned);
        }
    }

    fn on_group_written(&self, file: &OutputFile) {
        for o in &self.observers {
            o.on_group_written(file);
        }
    }

    fn on_index_written(&self, path: &Path, groups: usize, rows: usize) {
        for o in &self.observers {
            o.on_index_written(path, groups, rows);
        }
    }

    fn on_oversize(&self, report: &OversizeReport) {
        for o in &self.observers {
            o.on_oversize(report);
        }
    }

    fn on_failure(&self, severity: SplitSeverity, error: &SplitError) {
        for o in &self.observers {
            o.on_failure(severity, error);
        }
    }
}

/// Emits every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SplitObserver for TracingObserver {
    fn on_column_selected(&self, name: &str, index: usize) {
        info!(column = name, index, "using column '{name}' as group key");
    }

    fn on_progress(&self, rows: usize, groups: usize) {
        info!(rows, groups, "processed {rows} rows, {groups} groups");
    }

    fn on_collision_renamed(&self, key: &str, wanted: &str, assigned: &str) {
        warn!(key, wanted, assigned, "output filename collision, renamed");
    }

    fn on_group_written(&self, file: &OutputFile) {
        info!(
            key = %file.key,
            rows = file.row_count,
            bytes = file.size_bytes,
            "created {} ({} rows, {:.2} MB)",
            file.path.display(),
            file.row_count,
            file.size_mb()
        );
    }

    fn on_index_written(&self, path: &Path, groups: usize, rows: usize) {
        info!(groups, rows, "created index file {}", path.display());
    }

    fn on_oversize(&self, report: &OversizeReport) {
        for entry in &report.entries {
            warn!(
                key = %entry.key,
                rows = entry.row_count,
                threshold_mb = report.threshold_mb,
                "{} exceeds {} MB: {:.2} MB",
                entry.key,
                report.threshold_mb,
                entry.size_mb
            );
        }
    }

    fn on_failure(&self, severity: SplitSeverity, error: &SplitError) {
        error!(?severity, "split failed: {error}");
    }
}
