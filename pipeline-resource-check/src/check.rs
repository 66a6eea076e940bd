//! The `check` run.
//!
//! ## Steps
//!
//! 1. Reap stale log files beside the active log.
//! 2. Parse `source.insecure` and key the teams by name.
//! 3. Per team: log in, list pipelines.
//! 4. Per pipeline: fetch the raw config, fingerprint it.
//! 5. Return every `pipeline → token` pair.
//!
//! The first error from any step ends the run. Nothing is retried and no
//! partial versions are returned.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pipeline_resource_core::{
    CheckRequest, Connector, Directory, LoginRequest, PipelineName, PipelineVersions, TeamName,
};

use crate::error::CheckError;
use crate::fingerprint::fingerprint;
use crate::log_reaper::{reap_stale_logs, FsLogStore, LogStore, LOG_FILE_PREFIX};
use crate::normalize::{teams_by_name, InsecureFlag};

/// A configured `check` run.
///
/// `connector` and `directory` are usually the same client. Teams are
/// processed strictly one after another: each login produces the session used
/// for that team's listing and config fetches.
pub struct CheckCommand<'a, C, D, L = FsLogStore> {
    log_path: PathBuf,
    log_prefix: String,
    logs: L,
    connector: &'a C,
    directory: &'a D,
}

impl<'a, C, D> CheckCommand<'a, C, D, FsLogStore>
where
    C: Connector,
    D: Directory<C::Session>,
{
    /// Check against the real filesystem, using `log_path` as the active log.
    pub fn new(log_path: impl Into<PathBuf>, connector: &'a C, directory: &'a D) -> Self {
        Self {
            log_path: log_path.into(),
            log_prefix: LOG_FILE_PREFIX.to_string(),
            logs: FsLogStore,
            connector,
            directory,
        }
    }
}

impl<'a, C, D, L> CheckCommand<'a, C, D, L>
where
    C: Connector,
    D: Directory<C::Session>,
    L: LogStore,
{
    /// Replace the store used to find and remove stale logs.
    pub fn with_log_store<L2: LogStore>(self, logs: L2) -> CheckCommand<'a, C, D, L2> {
        CheckCommand {
            log_path: self.log_path,
            log_prefix: self.log_prefix,
            logs,
            connector: self.connector,
            directory: self.directory,
        }
    }

    /// Override the file name prefix that marks a check log.
    pub fn with_log_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_prefix = prefix.into();
        self
    }

    /// Run the check and return the version of every pipeline.
    pub fn run(&self, input: &CheckRequest) -> Result<PipelineVersions, CheckError> {
        reap_stale_logs(&self.logs, &self.log_path, &self.log_prefix)?;

        tracing::debug!(?input, "received input");

        let insecure = InsecureFlag::parse(&input.source.insecure)?;
        let teams = teams_by_name(&input.source.teams);

        let mut versions = PipelineVersions::new();
        let mut owners: BTreeMap<PipelineName, TeamName> = BTreeMap::new();

        for (team_name, team) in &teams {
            tracing::debug!(team = %team_name, "performing login");
            let session = self
                .connector
                .login(LoginRequest {
                    target: &input.source.target,
                    team: team_name,
                    username: &team.username,
                    password: &team.password,
                    insecure: insecure.0,
                })
                .map_err(|source| CheckError::Login {
                    team: team_name.clone(),
                    source,
                })?;
            tracing::debug!(team = %team_name, "login successful");

            let pipelines = self
                .directory
                .list_pipelines(&session, team_name)
                .map_err(|source| CheckError::ListPipelines {
                    team: team_name.clone(),
                    source,
                })?;
            tracing::debug!(team = %team_name, ?pipelines, "found pipelines");

            for pipeline in pipelines {
                tracing::debug!(pipeline = %pipeline.name, "getting pipeline");
                let config = self
                    .connector
                    .pipeline_config(&session, &pipeline.name)
                    .map_err(|source| CheckError::PipelineConfig {
                        pipeline: pipeline.name.clone(),
                        source,
                    })?;

                versions.insert(pipeline.name.clone(), fingerprint(&config));
                if let Some(previous) = owners.insert(pipeline.name.clone(), team_name.clone()) {
                    if previous != *team_name {
                        tracing::warn!(
                            pipeline = %pipeline.name,
                            team = %team_name,
                            previous_team = %previous,
                            "pipeline reported by more than one team; keeping the later version"
                        );
                    }
                }
            }
        }

        tracing::debug!(?versions, "returning output");
        Ok(versions)
    }
}
