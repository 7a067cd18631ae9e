//! CSV reading and row grouping.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{SplitError, SplitResult};
use crate::observability::SplitObserver;
use crate::types::{GroupStats, GroupedDataSet, KeyedGroups, Row};

/// Default marker searched for in header names.
pub const DEFAULT_KEY_MARKER: &str = "city";

/// Default number of grouped rows between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Options controlling the read-and-group phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Substring (case-insensitive) identifying the key column.
    pub key_column_marker: String,
    /// Emit a progress event every this many grouped rows. `0` disables progress events.
    pub progress_interval: usize,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            key_column_marker: DEFAULT_KEY_MARKER.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Returns the index of the first header containing `marker`, compared case-insensitively.
pub fn locate_key_column(headers: &[String], marker: &str) -> SplitResult<usize> {
    let needle = marker.to_lowercase();
    headers
        .iter()
        .position(|h| h.to_lowercase().contains(&needle))
        .ok_or_else(|| SplitError::ColumnNotFound {
            marker: marker.to_owned(),
            headers: headers.to_vec(),
        })
}

/// Read a CSV file and group its data rows by the key column.
///
/// Rules:
///
/// - The first line is the header.
/// - Rows too short to contain the key column are skipped.
/// - Rows whose trimmed key is empty are skipped.
/// - Every other row is appended, unmodified, to the group for its trimmed key.
pub fn group_csv_from_path(
    path: impl AsRef<Path>,
    options: &GroupingOptions,
    observer: &dyn SplitObserver,
) -> SplitResult<GroupedDataSet> {
    let path = path.as_ref();
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            let missing = matches!(
                e.kind(),
                ::csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound
            );
            if missing {
                SplitError::InputNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SplitError::Csv(e)
            }
        })?;
    group_csv_from_reader(&mut rdr, options, observer)
}

/// Group CSV data from an existing CSV reader.
///
/// The reader should be built with `flexible(true)`, otherwise rows whose length differs from
/// the header abort the read instead of being handled by the skip rules.
pub fn group_csv_from_reader<R: std::io::Read>(
    rdr: &mut ::csv::Reader<R>,
    options: &GroupingOptions,
    observer: &dyn SplitObserver,
) -> SplitResult<GroupedDataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let key_column = locate_key_column(&headers, &options.key_column_marker)?;
    observer.on_column_selected(&headers[key_column], key_column);

    let mut groups = KeyedGroups::new();
    let mut stats = GroupStats::default();

    for result in rdr.records() {
        let record = result?;
        stats.rows_read += 1;

        let Some(raw_key) = record.get(key_column) else {
            stats.skipped_short += 1;
            continue;
        };
        let key = raw_key.trim();
        if key.is_empty() {
            stats.skipped_empty_key += 1;
            continue;
        }

        let row: Row = record.iter().map(str::to_owned).collect();
        groups.push(key, row);
        stats.rows_grouped += 1;

        if options.progress_interval > 0 && stats.rows_grouped % options.progress_interval == 0 {
            observer.on_progress(stats.rows_grouped, groups.len());
        }
    }

    debug!(
        rows_read = stats.rows_read,
        skipped_short = stats.skipped_short,
        skipped_empty_key = stats.skipped_empty_key,
        "finished reading input"
    );

    Ok(GroupedDataSet {
        headers,
        key_column,
        groups,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::{GroupingOptions, group_csv_from_path, group_csv_from_reader, locate_key_column};
    use crate::error::{SplitError, SplitResult};
    use crate::observability::NoopObserver;
    use crate::types::GroupedDataSet;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn reader(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes())
    }

    fn group_default(input: &str) -> SplitResult<GroupedDataSet> {
        group_csv_from_reader(&mut reader(input), &GroupingOptions::default(), &NoopObserver)
    }

    #[test]
    fn locate_matches_substring_case_insensitively() {
        let h = headers(&["hotel_id", "Hotel Name", "CityName", "city_id"]);
        assert_eq!(locate_key_column(&h, "city").unwrap(), 2);
    }

    #[test]
    fn locate_reports_headers_when_missing() {
        let h = headers(&["id", "name", "country"]);
        match locate_key_column(&h, "city").unwrap_err() {
            SplitError::ColumnNotFound { marker, headers } => {
                assert_eq!(marker, "city");
                assert_eq!(headers, h);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn grouping_trims_keys_and_skips_empty_ones() {
        let input = "id,name,city\n1,Hotel A,Paris\n2,Hotel B, Paris \n3,Hotel C, \n";
        let ds = group_default(input).unwrap();

        assert_eq!(ds.key_column, 2);
        assert_eq!(ds.key_column_name(), "city");
        assert_eq!(ds.groups.len(), 1);
        let paris = ds.groups.get("Paris").unwrap();
        assert_eq!(paris.row_count(), 2);
        // rows are kept verbatim, only the key is trimmed
        assert_eq!(paris.rows[1][2], " Paris ");
        assert_eq!(ds.stats.rows_read, 3);
        assert_eq!(ds.stats.rows_grouped, 2);
        assert_eq!(ds.stats.skipped_empty_key, 1);
    }

    #[test]
    fn grouping_skips_rows_shorter_than_key_column() {
        let input = "id,city,name\n1,Rome,A\n2\n3,Rome\n";
        let ds = group_default(input).unwrap();

        assert_eq!(ds.groups.get("Rome").unwrap().row_count(), 2);
        assert_eq!(ds.stats.skipped_short, 1);
        assert_eq!(ds.stats.rows_grouped, 2);
    }

    #[test]
    fn empty_input_is_reported_as_missing_column() {
        let err = group_default("").unwrap_err();
        match err {
            SplitError::ColumnNotFound { headers, .. } => assert!(headers.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_marker_selects_other_column() {
        let input = "id,country,city\n1,FR,Paris\n2,IT,Rome\n3,FR,Lyon\n";
        let opts = GroupingOptions {
            key_column_marker: "COUNTRY".to_string(),
            ..Default::default()
        };
        let ds = group_csv_from_reader(&mut reader(input), &opts, &NoopObserver).unwrap();
        assert_eq!(ds.key_column, 1);
        assert_eq!(ds.groups.get("FR").unwrap().row_count(), 2);
    }

    #[test]
    fn missing_path_maps_to_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = group_csv_from_path(&path, &GroupingOptions::default(), &NoopObserver)
            .unwrap_err();
        match err {
            SplitError::InputNotFound { path: reported } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unopenable_path_keeps_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = group_csv_from_path(dir.path(), &GroupingOptions::default(), &NoopObserver)
            .unwrap_err();
        assert!(matches!(err, SplitError::Csv(_)), "unexpected error: {err}");
    }
}
