//! # pipeline-resource-check
//!
//! The `check` step: reap stale logs, log in as each team, list its
//! pipelines, fingerprint every pipeline config, assemble the versions.
//!
//! Call [`CheckCommand::run`] with a decoded [`CheckRequest`].
//!
//! [`CheckRequest`]: pipeline_resource_core::CheckRequest

pub mod check;
pub mod error;
pub mod fingerprint;
pub mod log_reaper;
pub mod normalize;

pub use check::CheckCommand;
pub use error::CheckError;
pub use fingerprint::fingerprint;
pub use log_reaper::{reap_stale_logs, FsLogStore, LogStore, LOG_FILE_PREFIX};
pub use normalize::{teams_by_name, InsecureFlag};
