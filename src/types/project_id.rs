// ABOUTME: Validated project identifier read from the project descriptor.
// ABOUTME: Must be usable verbatim as an image repository and container name component.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectIdError {
    #[error("projectId cannot be empty")]
    Empty,

    #[error("projectId exceeds maximum length of 128 characters")]
    TooLong,

    #[error("projectId must start and end with a letter or digit")]
    BadBoundary,

    #[error("projectId must be lowercase")]
    NotLowercase,

    #[error("invalid character in projectId: '{0}'")]
    InvalidChar(char),

    #[error("invalid separator '{0}' in projectId: use '.', '_', '__', or dashes")]
    BadSeparator(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: &str) -> Result<Self, ProjectIdError> {
        if value.is_empty() {
            return Err(ProjectIdError::Empty);
        }

        if value.len() > 128 {
            return Err(ProjectIdError::TooLong);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ProjectIdError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '-' | '_' | '.') {
                return Err(ProjectIdError::InvalidChar(c));
            }
        }

        let is_alnum = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
        if !is_alnum(value.chars().next()) || !is_alnum(value.chars().last()) {
            return Err(ProjectIdError::BadBoundary);
        }

        // Image repository components allow `.`, `_`, `__`, or a run of `-`
        // between alphanumeric runs.
        for run in value
            .split(|c: char| c.is_ascii_alphanumeric())
            .filter(|run| !run.is_empty())
        {
            let valid = matches!(run, "." | "_" | "__") || run.bytes().all(|b| b == b'-');
            if !valid {
                return Err(ProjectIdError::BadSeparator(run.to_string()));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
