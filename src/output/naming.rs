//! Filename sanitization and collision-free output planning.

use std::collections::{HashMap, HashSet};

use crate::error::{SplitError, SplitResult};
use crate::observability::SplitObserver;
use crate::types::{Group, KeyedGroups};

/// Extension of every group file.
pub const CSV_EXTENSION: &str = "csv";

/// Turn a group key into a filesystem-safe file stem.
///
/// ASCII letters, digits, spaces and hyphens are kept; every other character becomes `_`.
/// Spaces then become `-` and the result is lowercased. Sanitizing an already sanitized stem
/// returns it unchanged.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
            ' ' | '-' => '-',
            _ => '_',
        })
        .collect()
}

/// File name (stem plus extension) for a group key, before collision handling.
pub fn output_filename(key: &str) -> String {
    format!("{}.{CSV_EXTENSION}", sanitize_key(key))
}

/// What to do when two distinct keys sanitize to the same filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Keep the first key's name and append `-2`, `-3`, ... to later ones.
    #[default]
    Suffix,
    /// Abort the run before any file is written.
    Error,
}

/// A group paired with the filename it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile<'a> {
    pub group: &'a Group,
    pub filename: String,
}

/// Assign every group a unique filename.
///
/// Keys claim names in sorted order so the assignment does not depend on input order. The
/// returned plan follows the iteration order of `groups`.
pub fn plan_output_files<'a>(
    groups: &'a KeyedGroups,
    policy: CollisionPolicy,
    observer: &dyn SplitObserver,
) -> SplitResult<Vec<PlannedFile<'a>>> {
    let all: Vec<&Group> = groups.iter().collect();
    let stems: Vec<String> = all.iter().map(|g| sanitize_key(&g.key)).collect();
    let natural: HashSet<&str> = stems.iter().map(String::as_str).collect();

    let mut by_key: Vec<usize> = (0..all.len()).collect();
    by_key.sort_by(|&a, &b| all[a].key.cmp(&all[b].key));

    // stem -> key that owns it
    let mut taken: HashMap<String, &str> = HashMap::with_capacity(all.len());
    let mut assigned: Vec<String> = vec![String::new(); all.len()];

    for idx in by_key {
        let key = all[idx].key.as_str();
        let stem = &stems[idx];

        let chosen = match taken.get(stem.as_str()) {
            None => stem.clone(),
            Some(&existing) => match policy {
                CollisionPolicy::Error => {
                    return Err(SplitError::FilenameCollision {
                        filename: format!("{stem}.{CSV_EXTENSION}"),
                        existing: existing.to_owned(),
                        incoming: key.to_owned(),
                    });
                }
                CollisionPolicy::Suffix => {
                    let renamed = (2..)
                        .map(|n| format!("{stem}-{n}"))
                        .find(|c| !taken.contains_key(c) && !natural.contains(c.as_str()))
                        .unwrap_or_default();
                    observer.on_collision_renamed(
                        key,
                        &format!("{stem}.{CSV_EXTENSION}"),
                        &format!("{renamed}.{CSV_EXTENSION}"),
                    );
                    renamed
                }
            },
        };

        taken.insert(chosen.clone(), key);
        assigned[idx] = format!("{chosen}.{CSV_EXTENSION}");
    }

    Ok(all
        .into_iter()
        .zip(assigned)
        .map(|(group, filename)| PlannedFile { group, filename })
        .collect())
}
