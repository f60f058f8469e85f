// Logging module - diagnostic log file and HTTP exchange dumps
pub mod request_logger;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

pub use request_logger::{log_request_to_file, log_response_to_file, RequestLog};

/// Get or create the base vaidhya directory (~/.vaidhya)
/// Shared by the log files and the persisted session state
pub fn get_vaidhya_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let vaidhya_dir = PathBuf::from(home_dir).join(".vaidhya");

    if !vaidhya_dir.exists() {
        std::fs::create_dir_all(&vaidhya_dir).context("Failed to create vaidhya directory")?;
    }

    Ok(vaidhya_dir)
}

/// Get or create the logs directory (~/.vaidhya/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_vaidhya_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}

/// Install the global logger, writing to a dated file in the logs directory
///
/// Returns the path of the log file. `RUST_LOG` overrides the level.
pub fn init(verbose: bool) -> Result<PathBuf> {
    init_in(&get_logs_dir()?, verbose)
}

/// Same as [`init`] with an explicit directory
pub fn init_in(dir: &Path, verbose: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let path = dir.join(log_file_name(chrono::Local::now().date_naive()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    // A second init (tests, embedding) keeps the first logger.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();

    Ok(path)
}

fn log_file_name(date: chrono::NaiveDate) -> String {
    format!("vaidhya-{}.log", date.format("%Y-%m-%d"))
}
