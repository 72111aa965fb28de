// ABOUTME: Deploy command implementation.
// ABOUTME: Loads settings, connects to the runtime, runs the orchestrator, and reports the outcome.

use super::runtime_connection::connect_to_runtime;
use buzzcraft_deploy::config::Settings;
use buzzcraft_deploy::deploy::{
    DeployOutcome, DeployRequest, DeploySuccess, HttpProbe, Orchestrator,
};
use buzzcraft_deploy::error::{Error, Result};
use buzzcraft_deploy::output::{Output, OutputMode};
use std::path::PathBuf;

pub struct DeployArgs {
    pub path: PathBuf,
    pub local: bool,
    pub port: Option<String>,
    pub domain: Option<String>,
}

/// Deploy one project to the local runtime.
pub async fn deploy(args: DeployArgs, output: &mut Output) -> Result<()> {
    if !args.path.is_dir() {
        return Err(Error::ProjectNotFound(args.path));
    }
    if !args.local {
        tracing::debug!("no target given, deploying to the local runtime");
    }

    let settings = Settings::discover(&args.path)?;

    output.start_timer();
    output.progress(&format!("Deploying {}", args.path.display()));

    let runtime = connect_to_runtime(&settings, output).await?;
    let orchestrator = Orchestrator::new(runtime, HttpProbe);

    let request = DeployRequest {
        project_path: args.path,
        port: args.port,
        domain: args.domain,
    };

    let outcome = orchestrator.deploy(&request, &settings, &*output).await;
    report(&outcome, output)
}

fn report(outcome: &DeployOutcome, output: &Output) -> Result<()> {
    if output.mode() == OutputMode::Json {
        output.json(outcome);
        return match outcome.failure() {
            Some(failure) => Err(Error::DeployFailed(failure.error.clone())),
            None => Ok(()),
        };
    }

    match outcome {
        DeployOutcome::Success(success) => {
            for warning in &success.warnings {
                output.warning(warning);
            }
            if !success.healthy {
                output.progress("  ! Site did not respond to health checks");
            }
            output.result(&summary(success));
            Ok(())
        }
        DeployOutcome::Failure(failure) => {
            output.progress(&format!("  ✗ Failed while {}", failure.phase));
            for cause in &failure.stack {
                output.detail(&format!("    caused by: {cause}"));
            }
            Err(Error::DeployFailed(failure.error.clone()))
        }
    }
}

/// One line with everything a caller needs: where the site is, which
/// container serves it, and how long the deployment took.
fn summary(success: &DeploySuccess) -> String {
    format!(
        "Deployed {} at {} (container {}, {:.1}s)",
        success.project_id,
        success.url,
        success.container_name,
        success.duration.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzzcraft_deploy::types::{ContainerName, DeploymentId, ProjectId};
    use std::time::Duration;

    #[test]
    fn summary_names_url_container_and_duration() {
        let success = DeploySuccess {
            deployment_id: DeploymentId::generate(),
            project_id: ProjectId::new("corner-cafe").unwrap(),
            url: "http://localhost:3100".to_string(),
            container_name: ContainerName::new("buzzcraft-corner-cafe").unwrap(),
            duration: Duration::from_millis(42_400),
            healthy: true,
            warnings: Vec::new(),
        };

        assert_eq!(
            summary(&success),
            "Deployed corner-cafe at http://localhost:3100 (container buzzcraft-corner-cafe, 42.4s)"
        );
    }
}
