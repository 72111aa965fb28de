// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Later states carry what earlier steps produced, so it cannot be missing.

use crate::build::BuiltImage;

use super::health::HealthReport;
use super::lifecycle::ContainerHandle;
use super::network::AccessInfo;

/// Project validated and request resolved.
/// Available actions: `build_image()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated;

/// Image built and tagged.
/// Available actions: `replace_container()`
#[derive(Debug, Clone)]
pub struct ImageBuilt {
    pub(crate) image: BuiltImage,
}

/// Previous container gone, new one started.
/// Available actions: `configure_network()`
#[derive(Debug, Clone)]
pub struct ContainerReplaced {
    pub(crate) image: BuiltImage,
    pub(crate) container: ContainerHandle,
}

/// Access URL derived.
/// Available actions: `check_health()`
#[derive(Debug, Clone)]
pub struct NetworkConfigured {
    pub(crate) image: BuiltImage,
    pub(crate) container: ContainerHandle,
    pub(crate) access: AccessInfo,
}

/// Health probe finished, whatever it saw.
/// Available actions: `record()`
#[derive(Debug, Clone)]
pub struct HealthChecked {
    pub(crate) image: BuiltImage,
    pub(crate) container: ContainerHandle,
    pub(crate) access: AccessInfo,
    pub(crate) health: HealthReport,
}
