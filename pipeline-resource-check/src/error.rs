//! Error types for pipeline-resource-check.

use std::path::PathBuf;

use thiserror::Error;

use pipeline_resource_core::{ConnectorError, PipelineName, TeamName};

/// All errors that can abort a check run. None are retried.
#[derive(Debug, Error)]
pub enum CheckError {
    /// `source.insecure` is neither empty nor a boolean spelling.
    #[error("invalid value for source.insecure: {value:?} is not a boolean")]
    InvalidInsecure { value: String },

    /// Log directory listing or stale log removal failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Login for a team was rejected or could not be performed.
    #[error("login failed for team '{team}': {source}")]
    Login {
        team: TeamName,
        #[source]
        source: ConnectorError,
    },

    /// Listing a team's pipelines failed.
    #[error("listing pipelines failed for team '{team}': {source}")]
    ListPipelines {
        team: TeamName,
        #[source]
        source: ConnectorError,
    },

    /// Fetching a pipeline's configuration failed.
    #[error("fetching config failed for pipeline '{pipeline}': {source}")]
    PipelineConfig {
        pipeline: PipelineName,
        #[source]
        source: ConnectorError,
    },
}

/// Convenience constructor for [`CheckError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CheckError {
    CheckError::Io {
        path: path.into(),
        source,
    }
}
