// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ContainerConfig, ContainerInfo, BuildOptions, BuildEvent, etc.

use crate::types::{ContainerId, ContainerName, ImageRef};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for creating a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Name for the container.
    pub name: ContainerName,
    /// Image to run.
    pub image: ImageRef,
    /// Environment variables, in the order they are passed to the runtime.
    pub env: Vec<(String, String)>,
    /// Labels to apply.
    pub labels: HashMap<String, String>,
    /// Port mappings (host:container).
    pub ports: Vec<PortMapping>,
    /// Restart policy.
    pub restart_policy: RestartPolicyConfig,
    /// Stop timeout.
    pub stop_timeout: Option<Duration>,
}

impl ContainerConfig {
    /// Environment rendered as `KEY=value` strings.
    pub fn env_strings(&self) -> Vec<String> {
        self.env.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }
}

/// Port mapping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    /// Host port. None exposes the container port without publishing it.
    pub host_port: Option<u16>,
    /// Container port.
    pub container_port: u16,
    /// Protocol (tcp/udp).
    pub protocol: Protocol,
    /// Host IP to bind to.
    pub host_ip: Option<String>,
}

impl PortMapping {
    /// Runtime key for the container side, e.g. `3000/tcp`.
    pub fn port_key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

/// Network protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// Restart policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RestartPolicyConfig {
    /// Never restart.
    No,
    /// Always restart.
    Always,
    /// Restart unless explicitly stopped.
    #[default]
    UnlessStopped,
    /// Restart on failure with optional max retries.
    OnFailure { max_retries: Option<u32> },
}

/// Information about a container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    /// Container ID.
    pub id: ContainerId,
    /// Container name.
    pub name: String,
    /// Image used.
    pub image: String,
    /// Current state.
    pub state: ContainerState,
    /// Creation timestamp.
    pub created: String,
    /// Labels.
    pub labels: HashMap<String, String>,
}

/// Container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

impl ContainerState {
    /// States in which the container must be stopped before removal.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ContainerState::Running | ContainerState::Paused | ContainerState::Restarting
        )
    }
}

/// Options for an image build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Tag applied to the built image.
    pub tag: ImageRef,
    /// Build descriptor path inside the context.
    pub dockerfile: String,
    /// `--build-arg` values.
    pub build_args: HashMap<String, String>,
    /// Remove intermediate containers after a successful build.
    pub remove_intermediate: bool,
}

/// One event from a running image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A line of build output (step headers, command output).
    Output(String),
    /// A status message, e.g. layer pull progress.
    Status(String),
    /// The image was produced.
    Built { image_id: String },
    /// The runtime reported a build error.
    Failed { message: String },
}
