//! `owner/repo` identity of a remote repository.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Why a repository string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid repository \"{input}\": expected owner/repo using letters, digits, '_', '.' or '-'")]
pub struct InvalidRepoId {
    pub input: String,
}

/// A validated `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidRepoId> {
        let owner = owner.into();
        let name = name.into();
        if is_valid_segment(&owner) && is_valid_segment(&name) {
            Ok(Self { owner, name })
        } else {
            Err(InvalidRepoId {
                input: format!("{owner}/{name}"),
            })
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

impl FromStr for RepoId {
    type Err = InvalidRepoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRepoId {
            input: s.to_string(),
        };
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        Self::new(owner, name).map_err(|_| invalid())
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
