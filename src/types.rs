//! Core data model types for the split pipeline.
//!
//! Input rows are grouped into a [`GroupedDataSet`]: the original header plus a
//! [`KeyedGroups`] map from group key to the rows that carry it.

use std::collections::HashMap;
use std::path::PathBuf;

/// Bytes per megabyte as used for every size reported by this crate.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A single input record, fields in input order.
///
/// Arity usually matches the header but is not enforced.
pub type Row = Vec<String>;

/// All rows sharing one group key, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Trimmed key value.
    pub key: String,
    /// Rows carrying this key.
    pub rows: Vec<Row>,
}

impl Group {
    /// Number of rows in the group.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Insertion-ordered mapping from group key to [`Group`].
///
/// Keys iterate in first-seen order; rows inside a group keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedGroups {
    groups: Vec<Group>,
    positions: HashMap<String, usize>,
}

impl KeyedGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `row` to the group for `key`, creating the group on first sight.
    pub fn push(&mut self, key: &str, row: Row) {
        match self.positions.get(key) {
            Some(&idx) => self.groups[idx].rows.push(row),
            None => {
                self.positions.insert(key.to_owned(), self.groups.len());
                self.groups.push(Group {
                    key: key.to_owned(),
                    rows: vec![row],
                });
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up a group by its (trimmed) key.
    pub fn get(&self, key: &str) -> Option<&Group> {
        self.positions.get(key).map(|&idx| &self.groups[idx])
    }

    /// Iterate groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Total number of rows across all groups.
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(Group::row_count).sum()
    }
}

/// Counters collected while reading and grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    /// Data rows read (header excluded).
    pub rows_read: usize,
    /// Rows appended to some group.
    pub rows_grouped: usize,
    /// Rows too short to contain the key column.
    pub skipped_short: usize,
    /// Rows whose key is empty after trimming.
    pub skipped_empty_key: usize,
}

/// Result of the read-and-group phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedDataSet {
    /// Header row, verbatim field values.
    pub headers: Vec<String>,
    /// Index of the column used as group key.
    pub key_column: usize,
    /// Grouped rows.
    pub groups: KeyedGroups,
    /// Read counters.
    pub stats: GroupStats,
}

impl GroupedDataSet {
    /// Name of the column used as group key.
    pub fn key_column_name(&self) -> &str {
        &self.headers[self.key_column]
    }
}

/// Descriptor of one written group file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Original (unsanitized) group key.
    pub key: String,
    /// File name inside the output directory.
    pub filename: String,
    /// Full path of the written file.
    pub path: PathBuf,
    /// Data rows written (header excluded).
    pub row_count: usize,
    /// Size of the file on disk after flushing.
    pub size_bytes: u64,
}

impl OutputFile {
    /// File size in megabytes (unrounded).
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }
}

#[cfg(test)]
mod tests {
    use super::KeyedGroups;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keyed_groups_preserve_first_seen_key_order() {
        let mut groups = KeyedGroups::new();
        groups.push("Rome", row(&["1"]));
        groups.push("Paris", row(&["2"]));
        groups.push("Rome", row(&["3"]));

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Rome", "Paris"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.row_count(), 3);
    }

    #[test]
    fn keyed_groups_preserve_row_order_within_group() {
        let mut groups = KeyedGroups::new();
        groups.push("Rome", row(&["1"]));
        groups.push("Paris", row(&["2"]));
        groups.push("Rome", row(&["3"]));

        let rome = groups.get("Rome").unwrap();
        assert_eq!(rome.rows, vec![row(&["1"]), row(&["3"])]);
        assert!(groups.get("Berlin").is_none());
    }

    #[test]
    fn empty_groups_report_zero() {
        let groups = KeyedGroups::new();
        assert!(groups.is_empty());
        assert_eq!(groups.row_count(), 0);
    }
}
