// ABOUTME: Deployment settings and parsing for buzzcraft.deploy.yml.
// ABOUTME: Every field is optional; a project without a settings file deploys with defaults.

mod health;
mod init;
mod restart_policy;
mod stop;

pub use health::HealthConfig;
pub use init::init_settings;
pub use restart_policy::RestartPolicy;
pub use stop::StopConfig;

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use crate::types::{ContainerName, HostPort, ImageRef, ProjectId};
use serde::Deserialize;
use std::path::Path;

pub const SETTINGS_FILENAME: &str = "buzzcraft.deploy.yml";
pub const SETTINGS_FILENAME_ALT: &str = "buzzcraft.deploy.yaml";

/// Port the generated site listens on inside the container.
pub const CONTAINER_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_prefix")]
    pub container_prefix: String,

    #[serde(default = "default_namespace")]
    pub image_namespace: String,

    #[serde(default = "default_port")]
    pub default_port: HostPort,

    #[serde(
        default = "default_base_image",
        deserialize_with = "deserialize_image_ref"
    )]
    pub base_image: ImageRef,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub restart: RestartPolicy,

    #[serde(default)]
    pub stop: StopConfig,

    #[serde(default)]
    pub health: HealthConfig,

    /// Extra path names left out of the build archive.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_prefix() -> String {
    "buzzcraft".to_string()
}

fn default_namespace() -> String {
    "buzzcraft".to_string()
}

fn default_port() -> HostPort {
    HostPort::DEFAULT
}

fn default_base_image() -> ImageRef {
    ImageRef::node_alpine()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            container_prefix: default_prefix(),
            image_namespace: default_namespace(),
            default_port: default_port(),
            base_image: default_base_image(),
            runtime: RuntimeConfig::default(),
            restart: RestartPolicy::default(),
            stop: StopConfig::default(),
            health: HealthConfig::default(),
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.check()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Settings for the project at `dir`, or defaults if it has none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [dir.join(SETTINGS_FILENAME), dir.join(SETTINGS_FILENAME_ALT)];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading settings");
                return Self::load(path);
            }
        }

        Ok(Settings::default())
    }

    /// `<container_prefix>-<projectId>`.
    pub fn container_name(&self, project: &ProjectId) -> Result<ContainerName> {
        ContainerName::for_project(&self.container_prefix, project)
            .map_err(|e| Error::InvalidConfig(format!("container_prefix: {e}")))
    }

    /// `<image_namespace>/<projectId>:latest`.
    pub fn image_tag(&self, project: &ProjectId) -> Result<ImageRef> {
        ImageRef::for_project(&self.image_namespace, project)
            .map_err(|e| Error::InvalidConfig(format!("image_namespace: {e}")))
    }

    fn check(&self) -> Result<()> {
        if self.health.attempts == 0 {
            return Err(Error::InvalidConfig(
                "health.attempts must be at least 1".to_string(),
            ));
        }
        if self.container_prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "container_prefix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn deserialize_image_ref<'de, D>(deserializer: D) -> std::result::Result<ImageRef, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageRef::parse(&s).map_err(serde::de::Error::custom)
}
