// ABOUTME: Replaces a project's container: stop and remove the old one, create and start the new.
// ABOUTME: A missing previous container is the normal first-deploy case, not an error.

use crate::config::{CONTAINER_PORT, RestartPolicy};
use crate::runtime::{ContainerConfig, ContainerError, ContainerOps, PortMapping, Protocol};
use crate::types::{ContainerId, ContainerName};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use super::deployment::DeploymentConfig;
use super::network::local_url;

pub const LABEL_PROJECT: &str = "project";
pub const LABEL_DEPLOYMENT: &str = "deployment";
pub const LABEL_VERSION: &str = "version";

/// A started container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerHandle {
    pub id: ContainerId,
    pub name: ContainerName,
}

/// Runtime configuration for a project's container.
pub fn container_config(config: &DeploymentConfig, restart: &RestartPolicy) -> ContainerConfig {
    let env = vec![
        ("NODE_ENV".to_string(), "production".to_string()),
        ("NEXT_PUBLIC_SITE_URL".to_string(), local_url(config.port)),
        ("PORT".to_string(), CONTAINER_PORT.to_string()),
    ];

    let labels = HashMap::from([
        (
            LABEL_PROJECT.to_string(),
            config.project.project_id.to_string(),
        ),
        (
            LABEL_DEPLOYMENT.to_string(),
            config.deployment_id.to_string(),
        ),
        (LABEL_VERSION.to_string(), config.project.version.clone()),
    ]);

    ContainerConfig {
        name: config.container_name.clone(),
        image: config.image_tag.clone(),
        env,
        labels,
        ports: vec![PortMapping {
            host_port: Some(config.port.get()),
            container_port: CONTAINER_PORT,
            protocol: Protocol::Tcp,
            host_ip: None,
        }],
        restart_policy: restart.into(),
        stop_timeout: None,
    }
}

/// Stop (if active) and remove the container called `name`.
///
/// Returns the removed container's id, or `None` if there was nothing to
/// remove.
pub async fn remove_existing<R: ContainerOps + ?Sized>(
    runtime: &R,
    name: &ContainerName,
    stop_timeout: Duration,
) -> Result<Option<ContainerId>, ContainerError> {
    if !runtime.container_exists(name).await? {
        tracing::debug!(container = %name, "no previous container");
        return Ok(None);
    }

    let info = match runtime.inspect_container(name).await {
        Ok(info) => info,
        // Removed between the existence check and inspect.
        Err(ContainerError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    if info.state.is_active() {
        tracing::info!(container = %name, id = info.id.short(), "stopping previous container");
        match runtime.stop_container(&info.id, stop_timeout).await {
            Ok(()) | Err(ContainerError::NotRunning(_)) => {}
            Err(e) => return Err(e),
        }
    }

    match runtime.remove_container(&info.id, true).await {
        Ok(()) | Err(ContainerError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }
    tracing::info!(container = %name, id = info.id.short(), "removed previous container");

    Ok(Some(info.id))
}

/// Replace whatever runs under `config.name` with a fresh container.
///
/// Stop, remove, create, and start run strictly in that order; the first
/// failure stops the sequence and nothing is rolled back.
pub async fn replace<R: ContainerOps + ?Sized>(
    runtime: &R,
    config: &ContainerConfig,
    stop_timeout: Duration,
) -> Result<ContainerHandle, ContainerError> {
    remove_existing(runtime, &config.name, stop_timeout).await?;

    let id = runtime.create_container(config).await?;
    runtime.start_container(&id).await?;
    tracing::info!(container = %config.name, id = id.short(), "container started");

    Ok(ContainerHandle {
        id,
        name: config.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectDescriptor;
    use crate::runtime::fake::{Call, FakeRuntime};
    use crate::runtime::{ContainerState, RestartPolicyConfig};
    use crate::types::{DeploymentId, HostPort, ImageRef, ProjectId};
    use std::path::PathBuf;

    fn deployment_config() -> DeploymentConfig {
        let project_id = ProjectId::new("bakery").unwrap();
        DeploymentConfig {
            deployment_id: DeploymentId::generate(),
            container_name: ContainerName::for_project("buzzcraft", &project_id).unwrap(),
            image_tag: ImageRef::for_project("buzzcraft", &project_id).unwrap(),
            project: ProjectDescriptor {
                project_id,
                version: "2.0.1".to_string(),
                framework_version: "14.1.0".to_string(),
            },
            project_path: PathBuf::from("/srv/bakery"),
            port: HostPort::parse("3100").unwrap(),
            domain: "bakery.localhost".to_string(),
        }
    }

    #[test]
    fn config_binds_port_env_and_labels() {
        let deployment = deployment_config();
        let config = container_config(&deployment, &RestartPolicy::UnlessStopped);

        assert_eq!(config.image.to_string(), "buzzcraft/bakery:latest");
        assert_eq!(
            config.env_strings(),
            vec![
                "NODE_ENV=production",
                "NEXT_PUBLIC_SITE_URL=http://localhost:3100",
                "PORT=3000",
            ]
        );
        assert_eq!(config.ports[0].port_key(), "3000/tcp");
        assert_eq!(config.ports[0].host_port, Some(3100));
        assert_eq!(config.restart_policy, RestartPolicyConfig::UnlessStopped);
        assert_eq!(config.labels[LABEL_PROJECT], "bakery");
        assert_eq!(config.labels[LABEL_VERSION], "2.0.1");
        assert_eq!(
            config.labels[LABEL_DEPLOYMENT],
            deployment.deployment_id.to_string()
        );
    }

    #[tokio::test]
    async fn first_deploy_skips_stop_and_remove() {
        let runtime = FakeRuntime::new();
        let config = container_config(&deployment_config(), &RestartPolicy::default());

        let handle = replace(&runtime, &config, Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(handle.name.as_str(), "buzzcraft-bakery");
        assert_eq!(
            runtime.calls(),
            vec![
                Call::Exists("buzzcraft-bakery".to_string()),
                Call::Create("buzzcraft-bakery".to_string()),
                Call::Start(handle.id.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn running_container_is_stopped_before_removal() {
        let runtime = FakeRuntime::new().with_container("buzzcraft-bakery", ContainerState::Running);
        let config = container_config(&deployment_config(), &RestartPolicy::default());

        replace(&runtime, &config, Duration::from_secs(10))
            .await
            .unwrap();

        let calls = runtime.calls();
        let old = "existing-buzzcraft-bakery".to_string();
        let position = |call: &Call| calls.iter().position(|c| c == call).unwrap();
        let stop = position(&Call::Stop(old.clone()));
        let remove = position(&Call::Remove {
            id: old,
            force: true,
        });
        let create = position(&Call::Create("buzzcraft-bakery".to_string()));
        assert!(stop < remove && remove < create);
        assert_eq!(
            runtime.container_state("buzzcraft-bakery"),
            Some(ContainerState::Running)
        );
    }

    #[tokio::test]
    async fn exited_container_is_removed_without_stop() {
        let runtime = FakeRuntime::new().with_container("buzzcraft-bakery", ContainerState::Exited);

        let removed = remove_existing(
            &runtime,
            &ContainerName::new("buzzcraft-bakery").unwrap(),
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert!(removed.is_some());
        assert!(!runtime.calls().iter().any(|c| matches!(c, Call::Stop(_))));
    }

    #[tokio::test]
    async fn create_failure_is_fatal() {
        let runtime = FakeRuntime::new().with_create_failure("port is already allocated");
        let config = container_config(&deployment_config(), &RestartPolicy::default());

        let err = replace(&runtime, &config, Duration::from_secs(10))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("port is already allocated"));
        assert!(!runtime.calls().iter().any(|c| matches!(c, Call::Start(_))));
    }
}
