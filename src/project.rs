// ABOUTME: Confirms a directory holds a deployable BuzzCraft project.
// ABOUTME: Reads package.json and buzzcraft.json; makes no network or process calls.

use crate::types::{ProjectId, ProjectIdError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_FILE: &str = "package.json";
pub const DESCRIPTOR_FILE: &str = "buzzcraft.json";
pub const FRAMEWORK_PACKAGE: &str = "next";

/// Identity of a generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    pub project_id: ProjectId,
    pub version: String,
    /// Declared `next` version, e.g. `^14.1.0`.
    pub framework_version: String,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("package.json not found - not a Node.js project")]
    ManifestMissing,

    #[error("buzzcraft.json not found - not a BuzzCraft generated project")]
    DescriptorMissing,

    #[error("Next.js dependency not found in package.json")]
    FrameworkMissing,

    #[error("invalid {file}: {source}")]
    Malformed {
        file: &'static str,
        source: serde_json::Error,
    },

    #[error("invalid projectId in buzzcraft.json: {0}")]
    InvalidProjectId(#[from] ProjectIdError),

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, String>,
}

impl Manifest {
    fn framework_version(&self) -> Option<&str> {
        self.dependencies
            .get(FRAMEWORK_PACKAGE)
            .or_else(|| self.dev_dependencies.get(FRAMEWORK_PACKAGE))
            .map(String::as_str)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    project_id: String,
    version: String,
}

/// Validate the project at `path`.
///
/// Checks run in a fixed order: manifest present, descriptor present,
/// framework declared. The first failure wins.
pub async fn validate(path: &Path) -> Result<ProjectDescriptor, ValidationError> {
    let manifest = read_optional(&path.join(MANIFEST_FILE))
        .await?
        .ok_or(ValidationError::ManifestMissing)?;

    let descriptor = read_optional(&path.join(DESCRIPTOR_FILE))
        .await?
        .ok_or(ValidationError::DescriptorMissing)?;

    let manifest: Manifest =
        serde_json::from_str(&manifest).map_err(|source| ValidationError::Malformed {
            file: MANIFEST_FILE,
            source,
        })?;

    let framework_version = manifest
        .framework_version()
        .ok_or(ValidationError::FrameworkMissing)?
        .to_string();

    let descriptor: Descriptor =
        serde_json::from_str(&descriptor).map_err(|source| ValidationError::Malformed {
            file: DESCRIPTOR_FILE,
            source,
        })?;

    let project_id = ProjectId::new(&descriptor.project_id)?;

    tracing::debug!(
        project = %project_id,
        version = %descriptor.version,
        framework = %framework_version,
        "project validated"
    );

    Ok(ProjectDescriptor {
        project_id,
        version: descriptor.version,
        framework_version,
    })
}

async fn read_optional(path: &Path) -> Result<Option<String>, ValidationError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ValidationError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}
