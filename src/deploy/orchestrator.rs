// ABOUTME: Runs a deployment end to end and owns the registry of successful ones.
// ABOUTME: Every fatal error is caught here and turned into a failure outcome.

use std::time::Instant;

use crate::config::Settings;
use crate::diagnostics::Diagnostics;
use crate::runtime::{ContainerOps, ImageOps, LogOps};

use super::Deployment;
use super::deployment::DeployRequest;
use super::error::DeployError;
use super::health::HealthVerifier;
use super::outcome::{DeployFailure, DeployOutcome, DeploySuccess};
use super::phase::DeploymentPhase;
use super::probe::HealthProbe;
use super::progress::Progress;
use super::registry::{DeploymentRecord, DeploymentRegistry, millis};

/// Drives deployments against one runtime.
///
/// Deployments of different projects may run concurrently through `&self`.
/// Two overlapping deployments of the same project are not serialized; the
/// last container started wins.
pub struct Orchestrator<R, P> {
    runtime: R,
    probe: P,
    registry: DeploymentRegistry,
}

impl<R, P> Orchestrator<R, P>
where
    R: ImageOps + ContainerOps + LogOps,
    P: HealthProbe,
{
    pub fn new(runtime: R, probe: P) -> Self {
        Self {
            runtime,
            probe,
            registry: DeploymentRegistry::new(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn registry(&self) -> &DeploymentRegistry {
        &self.registry
    }

    /// Deploy the project named by `request`.
    ///
    /// Validation, build, and container replacement failures end in
    /// `DeployOutcome::Failure` with nothing cleaned up. Once the container
    /// has started the outcome is a success, whatever the health probe saw.
    pub async fn deploy(
        &self,
        request: &DeployRequest,
        settings: &Settings,
        progress: &dyn Progress,
    ) -> DeployOutcome {
        let started = Instant::now();
        let mut diagnostics = Diagnostics::default();

        match self
            .run(request, settings, progress, &mut diagnostics, started)
            .await
        {
            Ok(record) => {
                let success = DeploySuccess::from_record(&record, diagnostics.into_messages());
                tracing::info!(
                    project = %record.project_id,
                    deployment = %record.deployment_id,
                    url = %record.url,
                    duration_ms = millis(&record.duration),
                    "deployment recorded"
                );
                self.registry.insert(record);
                progress.phase(DeploymentPhase::Recorded);
                DeployOutcome::Success(success)
            }
            Err(err) => {
                let failure = DeployFailure::from_error(&err);
                tracing::error!(
                    project_path = %request.project_path.display(),
                    phase = %failure.phase,
                    "deployment failed: {}",
                    failure.error
                );
                for cause in &failure.stack {
                    tracing::debug!("caused by: {}", cause);
                }
                progress.phase(DeploymentPhase::Failed);
                DeployOutcome::Failure(failure)
            }
        }
    }

    async fn run(
        &self,
        request: &DeployRequest,
        settings: &Settings,
        progress: &dyn Progress,
        diagnostics: &mut Diagnostics,
        started: Instant,
    ) -> Result<DeploymentRecord, DeployError> {
        progress.phase(DeploymentPhase::Validating);
        let deployment = Deployment::prepare(request, settings).await?;
        tracing::info!(
            project = %deployment.project_id(),
            deployment = %deployment.deployment_id(),
            container = %deployment.container_name(),
            port = deployment.port().get(),
            "starting deployment"
        );

        progress.phase(DeploymentPhase::BuildingImage);
        let deployment = deployment
            .build_image(&self.runtime, settings, progress)
            .await?;

        progress.phase(DeploymentPhase::ReplacingContainer);
        let deployment = deployment
            .replace_container(&self.runtime, settings)
            .await?;

        progress.phase(DeploymentPhase::ConfiguringNetwork);
        let deployment = deployment.configure_network();

        progress.phase(DeploymentPhase::HealthChecking);
        let verifier = HealthVerifier::new(&self.probe, &settings.health);
        let deployment = deployment
            .check_health(&verifier, &self.runtime, diagnostics)
            .await;

        Ok(deployment.record(started.elapsed()))
    }
}
