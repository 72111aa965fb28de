// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::Utc;
use std::time::Duration;

use crate::build::{self, ExcludeSet, build_archive, write_build_context};
use crate::config::Settings;
use crate::diagnostics::Diagnostics;
use crate::project;
use crate::runtime::{ContainerOps, ImageOps, LogOps};
use crate::types::{DeploymentId, HostPort};

use super::Deployment;
use super::deployment::{DeployRequest, DeploymentConfig};
use super::error::DeployError;
use super::health::HealthVerifier;
use super::lifecycle;
use super::network;
use super::probe::HealthProbe;
use super::progress::Progress;
use super::registry::{DeploymentRecord, DeploymentStatus};
use super::state::{ContainerReplaced, HealthChecked, ImageBuilt, NetworkConfigured, Validated};

impl<S> Deployment<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            config: self.config,
            state,
        }
    }
}

// =============================================================================
// Request -> Validated
// =============================================================================

impl Deployment<Validated> {
    /// Resolve `request` against the project on disk.
    ///
    /// The port is parsed before the project is read; neither step writes
    /// files or talks to the runtime.
    ///
    /// # Errors
    ///
    /// `DeployError::Config` for a malformed port or settings,
    /// `DeployError::Validation` if the directory is not deployable.
    pub async fn prepare(request: &DeployRequest, settings: &Settings) -> Result<Self, DeployError> {
        let port = match request.port.as_deref() {
            Some(raw) => HostPort::parse(raw)?,
            None => settings.default_port,
        };

        let project = project::validate(&request.project_path).await?;

        let container_name = settings
            .container_name(&project.project_id)
            .map_err(|e| DeployError::Config(e.to_string()))?;
        let image_tag = settings
            .image_tag(&project.project_id)
            .map_err(|e| DeployError::Config(e.to_string()))?;

        let domain = request
            .domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.localhost", project.project_id));

        Ok(Deployment {
            config: DeploymentConfig {
                deployment_id: DeploymentId::generate(),
                project,
                project_path: request.project_path.clone(),
                container_name,
                image_tag,
                port,
                domain,
            },
            state: Validated,
        })
    }

    /// Write the build-context files, archive the project, and build its image.
    ///
    /// # Errors
    ///
    /// `DeployError::Archive` for file-system failures, `DeployError::Build`
    /// if the runtime rejects the build. Partial layers are left in place.
    #[must_use = "deployment state must be used"]
    pub async fn build_image<R: ImageOps + ?Sized>(
        self,
        runtime: &R,
        settings: &Settings,
        progress: &dyn Progress,
    ) -> Result<Deployment<ImageBuilt>, DeployError> {
        let path = &self.config.project_path;

        write_build_context(path, &settings.base_image).await?;

        let excludes = ExcludeSet::new(settings.exclude.iter().cloned());
        let context = build_archive(path, &excludes).await?;

        let image = build::build_image(runtime, &self.config.image_tag, context, progress).await?;

        Ok(self.transition(ImageBuilt { image }))
    }
}

// =============================================================================
// ImageBuilt -> ContainerReplaced
// =============================================================================

impl Deployment<ImageBuilt> {
    /// Stop and remove the project's previous container, then create and
    /// start the new one.
    ///
    /// # Errors
    ///
    /// `DeployError::Container` if any runtime call fails. The built image is
    /// kept either way.
    #[must_use = "deployment state must be used"]
    pub async fn replace_container<R: ContainerOps + ?Sized>(
        self,
        runtime: &R,
        settings: &Settings,
    ) -> Result<Deployment<ContainerReplaced>, DeployError> {
        let config = lifecycle::container_config(&self.config, &settings.restart);
        let container = lifecycle::replace(runtime, &config, settings.stop.timeout).await?;

        let image = self.state.image.clone();
        Ok(self.transition(ContainerReplaced { image, container }))
    }
}

// =============================================================================
// ContainerReplaced -> NetworkConfigured
// =============================================================================

impl Deployment<ContainerReplaced> {
    /// Derive the access URL. Cannot fail.
    pub fn configure_network(self) -> Deployment<NetworkConfigured> {
        let access = network::configure(&self.config);
        tracing::debug!(url = %access.url, domain = %access.domain, "access configured");

        let ContainerReplaced { image, container } = self.state.clone();
        self.transition(NetworkConfigured {
            image,
            container,
            access,
        })
    }
}

// =============================================================================
// NetworkConfigured -> HealthChecked
// =============================================================================

impl Deployment<NetworkConfigured> {
    /// Poll the site. Cannot fail; an unhealthy site is recorded in the
    /// report and in `diagnostics`.
    pub async fn check_health<P, R>(
        self,
        verifier: &HealthVerifier<'_, P>,
        runtime: &R,
        diagnostics: &mut Diagnostics,
    ) -> Deployment<HealthChecked>
    where
        P: HealthProbe + ?Sized,
        R: LogOps + ?Sized,
    {
        let health = verifier
            .verify(
                self.config.port,
                &self.state.container.id,
                runtime,
                diagnostics,
            )
            .await;

        let NetworkConfigured {
            image,
            container,
            access,
        } = self.state.clone();
        self.transition(HealthChecked {
            image,
            container,
            access,
            health,
        })
    }
}

// =============================================================================
// HealthChecked -> record
// =============================================================================

impl Deployment<HealthChecked> {
    /// Finish the deployment as a registry record.
    pub fn record(self, duration: Duration) -> DeploymentRecord {
        let HealthChecked {
            image,
            container,
            access,
            health,
        } = self.state;
        let config = self.config;

        DeploymentRecord {
            deployment_id: config.deployment_id,
            project_id: config.project.project_id,
            version: config.project.version,
            project_path: config.project_path,
            image_tag: image.tag,
            image_id: image.image_id,
            container,
            port: access.port,
            domain: access.domain,
            url: access.url,
            status: DeploymentStatus::Running,
            healthy: health.healthy,
            deployed_at: Utc::now(),
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::Silent;
    use crate::runtime::fake::FakeRuntime;
    use std::fs;
    use std::path::Path;

    fn write_project(dir: &Path) {
        fs::write(
            dir.join("package.json"),
            r#"{"dependencies":{"next":"14.1.0"}}"#,
        )
        .unwrap();
        fs::write(
            dir.join("buzzcraft.json"),
            r#"{"projectId":"florist","version":"0.3.0"}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn prepare_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        let deployment = Deployment::prepare(&DeployRequest::new(dir.path()), &Settings::default())
            .await
            .unwrap();

        assert_eq!(deployment.port().get(), 3000);
        assert_eq!(deployment.config().domain, "florist.localhost");
        assert_eq!(deployment.container_name().as_str(), "buzzcraft-florist");
        assert_eq!(
            deployment.config().image_tag.to_string(),
            "buzzcraft/florist:latest"
        );
    }

    #[tokio::test]
    async fn each_prepare_gets_a_fresh_deployment_id() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());
        let request = DeployRequest::new(dir.path());

        let a = Deployment::prepare(&request, &Settings::default()).await.unwrap();
        let b = Deployment::prepare(&request, &Settings::default()).await.unwrap();

        assert_ne!(a.deployment_id(), b.deployment_id());
        assert_eq!(a.container_name(), b.container_name());
    }

    #[tokio::test]
    async fn bad_port_wins_over_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let request = DeployRequest::new(dir.path()).with_port("0");

        let err = Deployment::prepare(&request, &Settings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Config(ref m) if m.contains("'0'")));
    }

    #[tokio::test]
    async fn build_writes_context_and_archives_dockerfile() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        let runtime = FakeRuntime::new();

        let deployment = Deployment::prepare(&DeployRequest::new(dir.path()), &Settings::default())
            .await
            .unwrap()
            .build_image(&runtime, &Settings::default(), &Silent)
            .await
            .unwrap();

        assert_eq!(
            deployment.state.image.image_id.as_ref().unwrap().as_str(),
            "sha256:fake"
        );
        assert!(dir.path().join("Dockerfile").exists());

        let context = &runtime.build_contexts()[0];
        let mut archive = tar::Archive::new(std::io::Cursor::new(context.to_vec()));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"Dockerfile".to_string()));
        assert!(names.contains(&".dockerignore".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("node_modules")));
    }
}
