// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Holds the per-attempt configuration every state shares.

use crate::project::ProjectDescriptor;
use crate::types::{ContainerName, DeploymentId, HostPort, ImageRef, ProjectId};
use std::path::{Path, PathBuf};

use super::health::HealthReport;
use super::lifecycle::ContainerHandle;
use super::network::AccessInfo;
use super::state::{ContainerReplaced, HealthChecked, NetworkConfigured};

/// What the caller asks for. The port is raw text and is validated before
/// anything else happens.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub project_path: PathBuf,
    pub port: Option<String>,
    pub domain: Option<String>,
}

impl DeployRequest {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            port: None,
            domain: None,
        }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Resolved configuration for one deployment attempt.
///
/// `deployment_id` is fresh for every attempt. `container_name` and
/// `image_tag` depend only on the project, so redeploys reuse them.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub deployment_id: DeploymentId,
    pub project: ProjectDescriptor,
    pub project_path: PathBuf,
    pub container_name: ContainerName,
    pub image_tag: ImageRef,
    pub port: HostPort,
    pub domain: String,
}

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries what earlier steps produced (the
/// built image, the started container) so later steps can rely on it.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: DeploymentConfig,
    pub(crate) state: S,
}

impl<S> Deployment<S> {
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn deployment_id(&self) -> DeploymentId {
        self.config.deployment_id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.config.project.project_id
    }

    pub fn project_path(&self) -> &Path {
        &self.config.project_path
    }

    pub fn container_name(&self) -> &ContainerName {
        &self.config.container_name
    }

    pub fn port(&self) -> HostPort {
        self.config.port
    }
}

impl Deployment<ContainerReplaced> {
    pub fn container(&self) -> &ContainerHandle {
        &self.state.container
    }
}

impl Deployment<NetworkConfigured> {
    pub fn container(&self) -> &ContainerHandle {
        &self.state.container
    }

    pub fn access(&self) -> &AccessInfo {
        &self.state.access
    }
}

impl Deployment<HealthChecked> {
    pub fn container(&self) -> &ContainerHandle {
        &self.state.container
    }

    pub fn access(&self) -> &AccessInfo {
        &self.state.access
    }

    pub fn health(&self) -> &HealthReport {
        &self.state.health
    }
}
