// ABOUTME: Error taxonomy for deployment orchestration.
// ABOUTME: Each variant maps to the phase it aborts.

use crate::build::{ArchiveError, BuildError};
use crate::project::ValidationError;
use crate::runtime::ContainerError;
use crate::types::HostPortError;

use super::phase::DeploymentPhase;

/// Fatal errors. Health-check timeouts are not errors and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The directory is not a deployable project.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed request or settings, e.g. a non-numeric port.
    #[error("configuration error: {0}")]
    Config(String),

    /// The project tree or build-context files could not be read or written.
    #[error("failed to package project: {0}")]
    Archive(#[from] ArchiveError),

    /// The runtime rejected the image build.
    #[error("image build failed: {0}")]
    Build(#[from] BuildError),

    /// Stop, remove, create, or start failed.
    #[error("container replacement failed: {0}")]
    Container(#[from] ContainerError),
}

impl DeployError {
    /// Phase in which this error stops a deployment.
    pub fn phase(&self) -> DeploymentPhase {
        match self {
            DeployError::Validation(_) | DeployError::Config(_) => DeploymentPhase::Validating,
            DeployError::Archive(_) | DeployError::Build(_) => DeploymentPhase::BuildingImage,
            DeployError::Container(_) => DeploymentPhase::ReplacingContainer,
        }
    }
}

impl From<HostPortError> for DeployError {
    fn from(err: HostPortError) -> Self {
        DeployError::Config(err.to_string())
    }
}
