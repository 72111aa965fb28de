// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Validate, build, replace, configure, health-check, record.

mod deployment;
mod error;
mod health;
mod lifecycle;
mod network;
mod orchestrator;
mod outcome;
mod phase;
mod probe;
mod progress;
mod registry;
mod state;
mod transitions;

pub use deployment::{DeployRequest, Deployment, DeploymentConfig};
pub use error::DeployError;
pub use health::{HealthReport, HealthVerifier};
pub use lifecycle::{
    ContainerHandle, LABEL_DEPLOYMENT, LABEL_PROJECT, LABEL_VERSION, container_config,
    remove_existing, replace,
};
pub use network::{AccessInfo, configure as configure_network, local_url};
pub use orchestrator::Orchestrator;
pub use outcome::{DeployFailure, DeployOutcome, DeploySuccess};
pub use phase::DeploymentPhase;
pub use probe::{HealthProbe, HttpProbe, ProbeError, is_serving};
pub use progress::{Progress, Silent};
pub use registry::{DeploymentRecord, DeploymentRegistry, DeploymentStatus};
pub use state::{ContainerReplaced, HealthChecked, ImageBuilt, NetworkConfigured, Validated};
