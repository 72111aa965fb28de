// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Local socket detection, capability traits, and the bollard-backed implementation.

mod bollard;
mod detection;
mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod traits;
mod types;

pub use bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::{
    BuildEvent, BuildEventStream, BuildOptions, ContainerConfig, ContainerError, ContainerInfo,
    ContainerOps, ContainerState, ImageError, ImageOps, LogError, LogLine, LogLineStream,
    LogOps, LogSource, PortMapping, Protocol, RestartPolicyConfig, RuntimeInfo as RuntimeInfoOps,
    RuntimeInfoError, RuntimeMetadata,
};
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};

