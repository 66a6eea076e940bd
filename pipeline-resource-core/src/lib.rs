//! Pipeline resource core library — domain types, capability traits, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes, request/response structs
//! - [`capability`] — [`Connector`] and [`Directory`], the seams to a CI server
//! - [`error`] — [`ConnectorError`]

pub mod capability;
pub mod error;
pub mod types;

pub use capability::{Connector, Directory, LoginRequest};
pub use error::ConnectorError;
pub use types::{
    CheckRequest, CheckResponse, Pipeline, PipelineName, PipelineVersions, Source, Team,
    TeamName, VersionToken,
};
