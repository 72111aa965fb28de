// ABOUTME: Container operations used to replace a project's container on redeploy.
// ABOUTME: Look up by name, then stop, remove, create, and start by id.

use super::sealed::Sealed;
use super::shared_types::{ContainerConfig, ContainerInfo};
use crate::types::{ContainerId, ContainerName};
use async_trait::async_trait;
use std::time::Duration;

/// Container lifecycle operations, in the order a replace calls them.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// Whether a container named `name` exists, in any state.
    ///
    /// Absence is `Ok(false)`, never an error.
    async fn container_exists(&self, name: &ContainerName) -> Result<bool, ContainerError>;

    /// Id, state, and labels of the container named `name`.
    async fn inspect_container(&self, name: &ContainerName)
    -> Result<ContainerInfo, ContainerError>;

    /// Ask the container to exit, killing it after `timeout`.
    ///
    /// A container that is already stopped yields `NotRunning`.
    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError>;

    /// Delete the container. `force` also kills it if still running.
    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;

    /// Create (but do not start) a container. Fails with `AlreadyExists`
    /// if the name is taken.
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError>;

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("no such container: {0}")]
    NotFound(String),

    #[error("container name is taken: {0}")]
    AlreadyExists(String),

    #[error("container is not running: {0}")]
    NotRunning(String),

    #[error("container is already running: {0}")]
    AlreadyRunning(String),

    /// The image named in the create request does not exist locally.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
