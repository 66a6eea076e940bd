//! Stale log removal.
//!
//! Every run writes a fresh log file named `<prefix><suffix>` next to the
//! logs of earlier runs. Before anything else is logged, every sibling that
//! starts with the same prefix is deleted, except the active file itself:
//!
//!   concourse-pipeline-resource-check.log.a1b2  (active, kept)
//!   concourse-pipeline-resource-check.log.x9y8  (stale, removed)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CheckError};

/// File name prefix shared by every check log.
pub const LOG_FILE_PREFIX: &str = "concourse-pipeline-resource-check.log";

/// Access to the directory holding check logs.
pub trait LogStore {
    /// Files directly inside `dir` whose file name starts with `prefix`.
    fn list_logs(&self, dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>>;

    /// Delete one file.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`LogStore`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLogStore;

impl LogStore for FsLogStore {
    fn list_logs(&self, dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
        let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
            .map(|e| e.path())
            .collect();
        logs.sort();
        Ok(logs)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Remove every log beside `active_log` that matches `prefix`, keeping
/// `active_log` itself.
///
/// Returns the removed paths. The first listing or removal failure aborts
/// the run; files removed before it stay removed.
pub fn reap_stale_logs<L: LogStore + ?Sized>(
    store: &L,
    active_log: &Path,
    prefix: &str,
) -> Result<Vec<PathBuf>, CheckError> {
    let dir = log_dir(active_log);
    let active_name = active_log.file_name();

    let existing = store.list_logs(dir, prefix).map_err(|e| io_err(dir, e))?;

    let mut removed = Vec::new();
    for path in existing {
        if path.file_name() == active_name {
            continue;
        }
        tracing::debug!(path = %path.display(), "removing existing log file");
        store.remove(&path).map_err(|e| io_err(&path, e))?;
        removed.push(path);
    }
    Ok(removed)
}

/// Directory holding `log_path`; a bare file name lives in `.`.
fn log_dir(log_path: &Path) -> &Path {
    match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
