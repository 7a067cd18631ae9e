//! Advisory report of group files larger than the configured size limit.

use crate::types::OutputFile;

/// Default size limit in MB, leaving headroom under a 100 MB hosting limit.
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OversizeEntry {
    pub key: String,
    pub filename: String,
    pub size_mb: f64,
    pub row_count: usize,
}

/// Group files whose size exceeds `threshold_mb`, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct OversizeReport {
    pub threshold_mb: f64,
    pub entries: Vec<OversizeEntry>,
}

impl OversizeReport {
    /// Compare each file's unrounded size against `threshold_mb`.
    ///
    /// A file exactly at the threshold is not oversized.
    pub fn from_files(files: &[OutputFile], threshold_mb: f64) -> Self {
        let entries = files
            .iter()
            .filter(|f| f.size_mb() > threshold_mb)
            .map(|f| OversizeEntry {
                key: f.key.clone(),
                filename: f.filename.clone(),
                size_mb: f.size_mb(),
                row_count: f.row_count,
            })
            .collect();
        Self {
            threshold_mb,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::OversizeReport;
    use crate::types::{BYTES_PER_MB, OutputFile};

    fn file(key: &str, mb: f64) -> OutputFile {
        OutputFile {
            key: key.to_string(),
            filename: format!("{}.csv", key.to_lowercase()),
            path: PathBuf::new(),
            row_count: 7,
            size_bytes: (mb * BYTES_PER_MB) as u64,
        }
    }

    #[test]
    fn only_files_above_threshold_are_listed() {
        let files = vec![file("Paris", 95.0), file("Rome", 10.0), file("Lyon", 90.0)];
        let report = OversizeReport::from_files(&files, 90.0);

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].key, "Paris");
        assert_eq!(report.entries[0].row_count, 7);
        assert!((report.entries[0].size_mb - 95.0).abs() < 1e-9);
    }

    #[test]
    fn no_files_means_empty_report() {
        assert!(OversizeReport::from_files(&[], 90.0).is_empty());
    }
}
