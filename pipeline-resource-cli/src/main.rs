//! `check` — the check step of the Concourse pipeline resource.
//!
//! # Usage
//!
//! ```text
//! echo '{"source": {...}}' | check [--log-dir <dir>] [--log-prefix <prefix>]
//! ```
//!
//! Reads a check request from stdin and writes `[{"<pipeline>": "<token>"}]`
//! to stdout. Debug logs go to a fresh file in the log directory; logs from
//! earlier runs are removed.

mod logging;

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pipeline_resource_check::{CheckCommand, LOG_FILE_PREFIX};
use pipeline_resource_concourse::ConcourseClient;
use pipeline_resource_core::{CheckRequest, CheckResponse};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "check",
    version,
    about = "Report a version per pipeline across Concourse teams",
    long_about = None,
)]
struct Cli {
    /// Directory for the run's log file. Defaults to the system temp dir.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// File name prefix shared by every check log.
    #[arg(long, default_value = LOG_FILE_PREFIX)]
    log_prefix: String,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_dir = cli.log_dir.unwrap_or_else(std::env::temp_dir);

    let log_path = logging::create_log_file(&log_dir, &cli.log_prefix)?;

    let mut stdin = Vec::new();
    io::stdin()
        .read_to_end(&mut stdin)
        .context("failed to read check request from stdin")?;
    let request = CheckRequest::from_json(&stdin).context("invalid check request on stdin")?;

    let client = ConcourseClient::new();
    let versions = match CheckCommand::new(&log_path, &client, &client)
        .with_log_prefix(cli.log_prefix)
        .run(&request)
    {
        Ok(versions) => versions,
        Err(err) => {
            tracing::error!(error = %err, "check failed");
            return Err(err).context("check failed");
        }
    };
    tracing::info!(pipelines = versions.len(), "check complete");

    let response = serde_json::to_string(&CheckResponse::from(versions))
        .context("failed to render check response JSON")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{response}").context("failed to write check response")?;
    Ok(())
}
