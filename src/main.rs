use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use city_splitter::SplitError;
use city_splitter::observability::TracingObserver;
use city_splitter::output::{CollisionPolicy, DEFAULT_MAX_FILE_SIZE_MB};
use city_splitter::pipeline::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_DIR, SplitConfig, split_by_key};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Split a large hotel CSV into one file per city, with a JSON lookup index
#[derive(Parser)]
#[command(name = "split-by-city")]
#[command(version)]
#[command(
    about = "Split a large hotel CSV into one file per city, with a JSON lookup index",
    long_about = None
)]
struct Cli {
    /// Source CSV file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "CITY_SPLIT_INPUT",
        default_value = DEFAULT_INPUT_PATH
    )]
    input: PathBuf,

    /// Directory for the per-city files and index.json
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "CITY_SPLIT_OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    output: PathBuf,

    /// Warn about files larger than this many MB
    #[arg(
        long,
        value_name = "MB",
        env = "CITY_SPLIT_MAX_SIZE_MB",
        default_value_t = DEFAULT_MAX_FILE_SIZE_MB
    )]
    max_size_mb: f64,

    /// Case-insensitive substring identifying the key column
    #[arg(long, value_name = "MARKER", env = "CITY_SPLIT_COLUMN", default_value = "city")]
    column: String,

    /// Log progress every N grouped rows (0 disables)
    #[arg(
        long,
        value_name = "ROWS",
        env = "CITY_SPLIT_PROGRESS_EVERY",
        default_value_t = 10_000
    )]
    progress_every: usize,

    /// What to do when two cities map to the same filename
    #[arg(
        long,
        value_enum,
        env = "CITY_SPLIT_ON_COLLISION",
        default_value_t = CollisionArg::Suffix
    )]
    on_collision: CollisionArg,

    /// Write city files in parallel
    #[arg(long, env = "CITY_SPLIT_PARALLEL")]
    parallel: bool,

    /// Log level: trace, debug, info, warn, error (defaults to RUST_LOG, then info)
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CollisionArg {
    /// Append -2, -3, ... to later names
    Suffix,
    /// Abort before writing anything
    Error,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Suffix => CollisionPolicy::Suffix,
            CollisionArg::Error => CollisionPolicy::Error,
        }
    }
}

impl Cli {
    fn to_config(&self) -> SplitConfig {
        SplitConfig {
            input_path: self.input.clone(),
            output_dir: self.output.clone(),
            max_file_size_mb: self.max_size_mb,
            key_column_marker: self.column.clone(),
            progress_interval: self.progress_every,
            collision_policy: self.on_collision.into(),
            parallel_writes: self.parallel,
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(&cli.to_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let split_err = err.downcast_ref::<SplitError>();
            match split_err {
                Some(SplitError::InputNotFound { .. }) => {
                    error!("please ensure the CSV file exists in the configured location");
                }
                Some(SplitError::ColumnNotFound { .. } | SplitError::FilenameCollision { .. }) => {}
                _ => error!("{err:?}"),
            }
            ExitCode::from(split_err.map(SplitError::exit_code).unwrap_or(1))
        }
    }
}

fn run(config: &SplitConfig) -> Result<()> {
    let summary = split_by_key(config, &TracingObserver)
        .with_context(|| format!("failed to split {}", config.input_path.display()))?;

    info!("split complete, created {} city files", summary.files.len());
    info!("files saved to {}", config.output_dir.display());

    if !summary.oversize.is_empty() {
        warn!(
            "{} cities exceed {} MB, consider splitting these by region or country",
            summary.oversize.entries.len(),
            summary.oversize.threshold_mb
        );
    }
    Ok(())
}
