// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Project ids, container names, host ports, and image references.

mod container_name;
mod deployment_id;
mod host_port;
mod id;
mod image_ref;
mod project_id;

pub use container_name::{ContainerName, ContainerNameError};
pub use deployment_id::DeploymentId;
pub use host_port::{HostPort, HostPortError};
pub use id::{ContainerId, ImageId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use project_id::{ProjectId, ProjectIdError};
