//! The `index.json` lookup document describing a split.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SplitResult;
use crate::types::OutputFile;

/// File name of the index inside the output directory.
pub const INDEX_FILENAME: &str = "index.json";

/// Index entry for one group file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub filename: String,
    pub hotel_count: usize,
    /// Size in MB rounded to two decimals.
    pub size_mb: f64,
}

/// Summary of every group file, keyed by the original group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityIndex {
    /// Sorted by key.
    pub cities: BTreeMap<String, CityEntry>,
    pub total_cities: usize,
    pub total_hotels: usize,
    pub csv_headers: Vec<String>,
}

impl CityIndex {
    /// Build the index from written file descriptors and the original header.
    pub fn from_files(files: &[OutputFile], headers: &[String]) -> Self {
        let cities: BTreeMap<String, CityEntry> = files
            .iter()
            .map(|f| {
                (
                    f.key.clone(),
                    CityEntry {
                        filename: f.filename.clone(),
                        hotel_count: f.row_count,
                        size_mb: round_mb(f.size_mb()),
                    },
                )
            })
            .collect();

        Self {
            total_cities: files.len(),
            total_hotels: files.iter().map(|f| f.row_count).sum(),
            cities,
            csv_headers: headers.to_vec(),
        }
    }
}

/// Round a megabyte figure to two decimals.
pub fn round_mb(mb: f64) -> f64 {
    (mb * 100.0).round() / 100.0
}

/// Serialize `index` as pretty JSON to `dir/index.json`.
pub fn write_index(dir: &Path, index: &CityIndex) -> SplitResult<PathBuf> {
    let path = dir.join(INDEX_FILENAME);
    let mut w = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut w, index)?;
    writeln!(w)?;
    w.flush()?;
    Ok(path)
}

/// Load a previously written index.
pub fn read_index(path: impl AsRef<Path>) -> SplitResult<CityIndex> {
    let r = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(r)?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{CityIndex, read_index, round_mb, write_index};
    use crate::types::OutputFile;

    fn file(key: &str, filename: &str, rows: usize, bytes: u64) -> OutputFile {
        OutputFile {
            key: key.to_string(),
            filename: filename.to_string(),
            path: PathBuf::from(filename),
            row_count: rows,
            size_bytes: bytes,
        }
    }

    #[test]
    fn round_mb_keeps_two_decimals() {
        assert_eq!(round_mb(1.234_9), 1.23);
        assert_eq!(round_mb(1.235_1), 1.24);
        assert_eq!(round_mb(0.0), 0.0);
    }

    #[test]
    fn index_totals_and_sorted_keys() {
        let headers = vec!["id".to_string(), "city".to_string()];
        let files = vec![
            file("Rome", "rome.csv", 3, 3 * 1024 * 1024),
            file("Paris", "paris.csv", 2, 1024 * 1024 / 2),
        ];
        let index = CityIndex::from_files(&files, &headers);

        assert_eq!(index.total_cities, 2);
        assert_eq!(index.total_hotels, 5);
        assert_eq!(index.csv_headers, headers);
        let keys: Vec<&str> = index.cities.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Paris", "Rome"]);
        assert_eq!(index.cities["Paris"].size_mb, 0.5);
        assert_eq!(index.cities["Rome"].hotel_count, 3);
    }

    #[test]
    fn empty_index_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let index = CityIndex::from_files(&[], &["id".to_string()]);
        let path = write_index(dir.path(), &index).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_cities"], 0);
        assert_eq!(value["total_hotels"], 0);
        assert!(value["cities"].as_object().unwrap().is_empty());
        assert_eq!(read_index(&path).unwrap(), index);
    }

    #[test]
    fn index_fields_keep_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = [file("Paris", "paris.csv", 1, 10)];
        let index = CityIndex::from_files(&files, &["city".to_string()]);
        let path = write_index(dir.path(), &index).unwrap();
        let text = std::fs::read_to_string(path).unwrap();

        let pos = |field: &str| text.find(&format!("\"{field}\"")).unwrap();
        assert!(pos("cities") < pos("total_cities"));
        assert!(pos("total_cities") < pos("total_hotels"));
        assert!(pos("total_hotels") < pos("csv_headers"));
        assert!(text.contains("\n  \"cities\": {"));
    }
}
