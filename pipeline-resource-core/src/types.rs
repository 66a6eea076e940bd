//! Domain types for the `check` step.
//!
//! Everything here is built fresh from the incoming request and dropped once
//! the response is written. All types round-trip through serde_json.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a team on the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(pub String);

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed pipeline name. Unique per check run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineName(pub String);

impl fmt::Display for PipelineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PipelineName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PipelineName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Lowercase-hex content digest of a pipeline's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(pub String);

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for VersionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VersionToken {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Pipeline name → version token. Ordered so the emitted JSON is stable.
pub type PipelineVersions = BTreeMap<PipelineName, VersionToken>;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Credentials for one team.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: TeamName,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Passwords never reach the log file.
impl fmt::Debug for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Team")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The `source` block of a resource request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Base URL of the Concourse server.
    pub target: String,
    /// Free-form boolean; empty means `false`.
    #[serde(default)]
    pub insecure: String,
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// Request read from stdin for `check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub source: Source,
    /// Last version the host knows about. Decoded but not consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PipelineVersions>,
}

impl CheckRequest {
    /// Decode a request from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

// ---------------------------------------------------------------------------
// Directory entries
// ---------------------------------------------------------------------------

/// A pipeline as reported by the directory. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: PipelineName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<TeamName>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub public: bool,
}

impl Pipeline {
    pub fn named(name: impl Into<PipelineName>) -> Self {
        Self {
            name: name.into(),
            team_name: None,
            paused: false,
            public: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Response written to stdout: a list holding one version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckResponse(pub Vec<PipelineVersions>);

impl From<PipelineVersions> for CheckResponse {
    fn from(versions: PipelineVersions) -> Self {
        Self(vec![versions])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
