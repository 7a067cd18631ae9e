//! Writing group files.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::error::SplitResult;
use crate::observability::SplitObserver;
use crate::types::{Group, OutputFile};

use super::naming::PlannedFile;

/// Write one group as `dir/filename`: the header line followed by every row of the group.
///
/// The file is flushed and closed before its size is read back.
pub fn write_group_file(
    dir: &Path,
    filename: &str,
    headers: &[String],
    group: &Group,
) -> SplitResult<OutputFile> {
    let path = dir.join(filename);
    {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&path)?;
        wtr.write_record(headers)?;
        for row in &group.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
    }

    let size_bytes = fs::metadata(&path)?.len();
    Ok(OutputFile {
        key: group.key.clone(),
        filename: filename.to_owned(),
        path,
        row_count: group.row_count(),
        size_bytes,
    })
}

/// Write every planned group file into `dir`, creating it if needed.
///
/// With `parallel` set, files are written on the rayon pool. Descriptors come back in plan
/// order either way; the first failure stops the phase.
pub fn write_groups(
    dir: &Path,
    headers: &[String],
    plan: &[PlannedFile<'_>],
    parallel: bool,
    observer: &dyn SplitObserver,
) -> SplitResult<Vec<OutputFile>> {
    fs::create_dir_all(dir)?;

    let write_one = |planned: &PlannedFile<'_>| -> SplitResult<OutputFile> {
        let file = write_group_file(dir, &planned.filename, headers, planned.group)?;
        observer.on_group_written(&file);
        Ok(file)
    };

    if parallel {
        plan.par_iter().map(write_one).collect()
    } else {
        plan.iter().map(write_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::write_group_file;
    use crate::types::Group;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn writes_header_then_rows_with_standard_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let headers = strings(&["id", "name", "city"]);
        let group = Group {
            key: "Paris".to_string(),
            rows: vec![
                strings(&["1", "Hotel \"Lux\", Centre", "Paris"]),
                strings(&["2", "Hotel B", "Paris"]),
            ],
        };

        let out = write_group_file(dir.path(), "paris.csv", &headers, &group).unwrap();
        let text = std::fs::read_to_string(&out.path).unwrap();

        assert_eq!(
            text,
            "id,name,city\n1,\"Hotel \"\"Lux\"\", Centre\",Paris\n2,Hotel B,Paris\n"
        );
        assert_eq!(out.row_count, 2);
        assert_eq!(out.size_bytes, text.len() as u64);
        assert_eq!(out.filename, "paris.csv");
    }

    #[test]
    fn keeps_rows_with_uneven_arity() {
        let dir = tempfile::tempdir().unwrap();
        let headers = strings(&["id", "city", "name"]);
        let group = Group {
            key: "Rome".to_string(),
            rows: vec![strings(&["1", "Rome"]), strings(&["2", "Rome", "B", "extra"])],
        };

        let out = write_group_file(dir.path(), "rome.csv", &headers, &group).unwrap();
        let text = std::fs::read_to_string(&out.path).unwrap();
        assert_eq!(text, "id,city,name\n1,Rome\n2,Rome,B,extra\n");
    }
}
