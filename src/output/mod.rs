//! Everything written to the output directory: group files, the index, and the oversize check.

pub mod index;
pub mod naming;
pub mod report;
pub mod writer;

pub use index::{CityEntry, CityIndex, INDEX_FILENAME, read_index, write_index};
pub use naming::{
    CollisionPolicy, PlannedFile, output_filename, plan_output_files, sanitize_key,
};
pub use report::{DEFAULT_MAX_FILE_SIZE_MB, OversizeEntry, OversizeReport};
pub use writer::{write_group_file, write_groups};
