//! Per-run log file and tracing subscriber.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Create `<dir>/<prefix><random>` and route tracing output into it.
///
/// The file outlives the process so the next run can find and reap it.
/// Returns the path of the new log file.
pub fn create_log_file(dir: &Path, prefix: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let (file, path) = tempfile::Builder::new()
        .prefix(prefix)
        .tempfile_in(dir)
        .with_context(|| format!("failed to create log file in {}", dir.display()))?
        .keep()
        .context("failed to keep log file")?;

    init_tracing(file);
    Ok(path)
}

fn init_tracing(file: std::fs::File) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
