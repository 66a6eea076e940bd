//! Blocking Concourse API client.
//!
//! ## Endpoints
//!
//! | capability | request |
//! |---|---|
//! | login | `POST /sky/issuer/token` (password grant, `fly` client) |
//! | list pipelines | `GET /api/v1/teams/<team>/pipelines` |
//! | pipeline config | `GET /api/v1/teams/<team>/pipelines/<name>/config` |
//!
//! Every call after login carries the bearer token of the session it is
//! given. Nothing is retried and no timeouts are set; the host bounds the
//! process lifetime.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;

use pipeline_resource_core::{
    Connector, ConnectorError, Directory, LoginRequest, Pipeline, PipelineName, TeamName,
};

/// Basic-auth header for the public `fly` OAuth client (`fly:Zmx5`).
const FLY_CLIENT_AUTH: &str = "Basic Zmx5OlpteDU=";

/// Scopes requested by `fly login`.
const TOKEN_SCOPE: &str = "openid profile email federated:id groups";

/// Authenticated handle for one team.
#[derive(Clone)]
pub struct ConcourseSession {
    agent: ureq::Agent,
    target: String,
    team: TeamName,
    token: String,
}

impl ConcourseSession {
    pub fn team(&self) -> &TeamName {
        &self.team
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Debug for ConcourseSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcourseSession")
            .field("target", &self.target)
            .field("team", &self.team)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    id_token: Option<String>,
}

impl TokenResponse {
    /// Concourse accepts the ID token as bearer; older servers only issue an
    /// access token.
    fn bearer(self) -> String {
        match self.id_token {
            Some(id) if !id.is_empty() => id,
            _ => self.access_token,
        }
    }
}

/// Talks to a Concourse server over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct ConcourseClient;

impl ConcourseClient {
    pub fn new() -> Self {
        Self
    }

    fn agent(insecure: bool) -> Result<ureq::Agent, ConnectorError> {
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(insecure)
            .danger_accept_invalid_hostnames(insecure)
            .build()
            .map_err(|e| ConnectorError::Tls(e.to_string()))?;
        Ok(ureq::AgentBuilder::new().tls_connector(Arc::new(tls)).build())
    }

    fn get(&self, session: &ConcourseSession, url: &str) -> Result<ureq::Response, ConnectorError> {
        session
            .agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", session.token))
            .call()
            .map_err(|e| request_err(url, e))
    }
}

impl Connector for ConcourseClient {
    type Session = ConcourseSession;

    fn login(&self, req: LoginRequest<'_>) -> Result<ConcourseSession, ConnectorError> {
        let agent = Self::agent(req.insecure)?;
        let target = req.target.trim_end_matches('/').to_string();
        let url = format!("{target}/sky/issuer/token");

        tracing::debug!(%url, team = %req.team, "requesting token");
        let token: TokenResponse = agent
            .post(&url)
            .set("Authorization", FLY_CLIENT_AUTH)
            .send_form(&[
                ("grant_type", "password"),
                ("username", req.username),
                ("password", req.password),
                ("scope", TOKEN_SCOPE),
            ])
            .map_err(|e| request_err(&url, e))?
            .into_json()
            .map_err(|source| ConnectorError::Decode {
                url: url.clone(),
                source,
            })?;

        Ok(ConcourseSession {
            agent,
            target,
            team: req.team.clone(),
            token: token.bearer(),
        })
    }

    fn pipeline_config(
        &self,
        session: &ConcourseSession,
        pipeline: &PipelineName,
    ) -> Result<Vec<u8>, ConnectorError> {
        let url = format!(
            "{}/api/v1/teams/{}/pipelines/{}/config",
            session.target, session.team, pipeline
        );
        let mut body = Vec::new();
        self.get(session, &url)?
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|source| ConnectorError::Decode {
                url: url.clone(),
                source,
            })?;
        Ok(body)
    }
}

impl Directory<ConcourseSession> for ConcourseClient {
    fn list_pipelines(
        &self,
        session: &ConcourseSession,
        team: &TeamName,
    ) -> Result<Vec<Pipeline>, ConnectorError> {
        let url = format!("{}/api/v1/teams/{}/pipelines", session.target, team);
        self.get(session, &url)?
            .into_json()
            .map_err(|source| ConnectorError::Decode { url, source })
    }
}

fn request_err(url: &str, err: ureq::Error) -> ConnectorError {
    match err {
        ureq::Error::Status(status, response) => ConnectorError::Status {
            url: url.to_string(),
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ConnectorError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}
