// ABOUTME: Structured result of a deployment attempt.
// ABOUTME: Callers get a value, never a raw error; both sides serialize with a success flag.

use crate::types::{ContainerName, DeploymentId, ProjectId};
use serde::{Serialize, Serializer};
use std::error::Error as StdError;
use std::time::Duration;

use super::error::DeployError;
use super::phase::DeploymentPhase;
use super::registry::{DeploymentRecord, serialize_millis};

#[derive(Debug, Clone)]
pub enum DeployOutcome {
    Success(DeploySuccess),
    Failure(DeployFailure),
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploySuccess {
    pub deployment_id: DeploymentId,
    pub project_id: ProjectId,
    pub url: String,
    pub container_name: ContainerName,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Informational; an unhealthy site is still a successful deployment.
    pub healthy: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployFailure {
    pub phase: DeploymentPhase,
    pub error: String,
    /// Source chain below `error`, outermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
}

impl DeploySuccess {
    pub(crate) fn from_record(record: &DeploymentRecord, warnings: Vec<String>) -> Self {
        Self {
            deployment_id: record.deployment_id,
            project_id: record.project_id.clone(),
            url: record.url.clone(),
            container_name: record.container.name.clone(),
            duration: record.duration,
            healthy: record.healthy,
            warnings,
        }
    }
}

impl DeployFailure {
    pub fn from_error(err: &DeployError) -> Self {
        let mut stack = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push(cause.to_string());
            source = cause.source();
        }

        Self {
            phase: err.phase(),
            error: err.to_string(),
            stack,
        }
    }
}

impl DeployOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeployOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&DeploySuccess> {
        match self {
            DeployOutcome::Success(s) => Some(s),
            DeployOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&DeployFailure> {
        match self {
            DeployOutcome::Success(_) => None,
            DeployOutcome::Failure(f) => Some(f),
        }
    }
}

#[derive(Serialize)]
struct Flagged<'a, T> {
    success: bool,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for DeployOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeployOutcome::Success(inner) => Flagged {
                success: true,
                inner,
            }
            .serialize(serializer),
            DeployOutcome::Failure(inner) => Flagged {
                success: false,
                inner,
            }
            .serialize(serializer),
        }
    }
}
