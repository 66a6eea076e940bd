//! Input normalization: the insecure flag and the team map.

use std::str::FromStr;

use indexmap::IndexMap;

use pipeline_resource_core::{Team, TeamName};

use crate::error::CheckError;

/// Parsed form of `source.insecure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsecureFlag(pub bool);

impl InsecureFlag {
    /// Empty is `false`. Otherwise accepts `1 t T TRUE true True` and
    /// `0 f F FALSE false False`.
    pub fn parse(raw: &str) -> Result<Self, CheckError> {
        match raw {
            "" => Ok(Self(false)),
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Self(true)),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Self(false)),
            other => Err(CheckError::InvalidInsecure {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for InsecureFlag {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Key teams by name.
///
/// A repeated name keeps the position of its first appearance and the record
/// of its last appearance, so iteration order follows the input.
pub fn teams_by_name(teams: &[Team]) -> IndexMap<TeamName, Team> {
    let mut by_name = IndexMap::with_capacity(teams.len());
    for team in teams {
        by_name.insert(team.name.clone(), team.clone());
    }
    by_name
}
