// ABOUTME: Container name derived deterministically from a project id.
// ABOUTME: Redeploys of the same project always target the same name.

use super::ProjectId;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name must start with a letter or digit")]
    BadStart,

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// A name accepted by Docker and Podman: `[a-zA-Z0-9][a-zA-Z0-9_.-]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let first = value.chars().next().ok_or(ContainerNameError::Empty)?;
        if !first.is_ascii_alphanumeric() {
            return Err(ContainerNameError::BadStart);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.') {
                return Err(ContainerNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// `<prefix>-<projectId>`.
    pub fn for_project(prefix: &str, project: &ProjectId) -> Result<Self, ContainerNameError> {
        Self::new(&format!("{}-{}", prefix, project))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
