//! Capability traits for talking to a remote CI server.
//!
//! Login returns an explicit session handle. Every call that needs a team's
//! identity takes that handle, so nothing depends on which team logged in
//! last. Implementations are the real HTTP client and test fakes.

use crate::error::ConnectorError;
use crate::types::{Pipeline, PipelineName, TeamName};

/// Everything needed to authenticate as one team.
#[derive(Clone, Copy)]
pub struct LoginRequest<'a> {
    /// Base URL of the CI server.
    pub target: &'a str,
    pub team: &'a TeamName,
    pub username: &'a str,
    pub password: &'a str,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("target", &self.target)
            .field("team", &self.team)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Authentication and raw pipeline-config retrieval.
pub trait Connector {
    /// Session handle scoped to the team that logged in.
    type Session;

    /// Authenticate as `req.team`.
    fn login(&self, req: LoginRequest<'_>) -> Result<Self::Session, ConnectorError>;

    /// Fetch the raw configuration bytes of `pipeline` for the session's team.
    fn pipeline_config(
        &self,
        session: &Self::Session,
        pipeline: &PipelineName,
    ) -> Result<Vec<u8>, ConnectorError>;
}

/// Lists the pipelines belonging to a team.
pub trait Directory<S> {
    fn list_pipelines(&self, session: &S, team: &TeamName)
        -> Result<Vec<Pipeline>, ConnectorError>;
}
