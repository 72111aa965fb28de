// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Supports both Docker and Podman via the Docker-compatible API.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    BuildEvent, BuildEventStream, BuildOptions, ContainerConfig, ContainerError, ContainerInfo,
    ContainerOps, ContainerState, ImageError, ImageOps, LogError, LogLine, LogLineStream, LogOps,
    RestartPolicyConfig, RuntimeInfo, RuntimeInfoError, RuntimeMetadata,
};
use crate::runtime::types::{RuntimeInfo as DetectedRuntime, RuntimeType};
use crate::types::{ContainerId, ContainerName, ImageRef};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding, RestartPolicy, RestartPolicyNameEnum};
use bollard::query_parameters::{
    BuildImageOptions, CreateContainerOptions, InspectContainerOptions, LogsOptions,
    RemoveContainerOptions, RemoveImageOptions, StopContainerOptions,
};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::{Either, Full};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_remove_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ImageError::InUse(message.clone()),
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image_name, e)),
    }
}

fn map_container_create_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::ImageNotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::AlreadyExists(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_start_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 304 => ContainerError::AlreadyRunning(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_stop_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 304 => ContainerError::NotRunning(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_not_found_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_build_info(info: bollard::models::BuildInfo) -> Vec<BuildEvent> {
    let mut events = Vec::new();

    if let Some(detail) = info.error_detail {
        let message = detail
            .message
            .unwrap_or_else(|| "image build failed".to_string());
        events.push(BuildEvent::Failed { message });
        return events;
    }

    if let Some(line) = info.stream {
        let line = line.trim_end();
        if !line.is_empty() {
            events.push(BuildEvent::Output(line.to_string()));
        }
    }

    if let Some(status) = info.status {
        events.push(BuildEvent::Status(status));
    }

    if let Some(image_id) = info.aux.and_then(|aux| aux.id) {
        events.push(BuildEvent::Built { image_id });
    }

    events
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
///
/// Supports both Docker and Podman via Docker-compatible API.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
    socket: String,
}

impl BollardRuntime {
    /// Connect to the runtime found by `detect_local()`.
    ///
    /// No request is made yet; call `ping` to check the daemon is up.
    pub fn connect(info: &DetectedRuntime) -> Result<Self, RuntimeInfoError> {
        let client =
            Docker::connect_with_unix(&info.socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| RuntimeInfoError::Unreachable {
                    socket: info.socket_path.clone(),
                    reason: e.to_string(),
                })?;

        Ok(Self {
            client,
            runtime_type: info.runtime_type,
            socket: info.socket_path.clone(),
        })
    }

    fn info_error(&self, e: bollard::errors::Error) -> RuntimeInfoError {
        match e {
            bollard::errors::Error::DockerResponseServerError { message, .. } => {
                RuntimeInfoError::Rejected(message)
            }
            e => RuntimeInfoError::Unreachable {
                socket: self.socket.clone(),
                reason: e.to_string(),
            },
        }
    }
}

impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client.ping().await.map_err(|e| self.info_error(e))?;
        Ok(())
    }

    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let info = self.client.info().await.map_err(|e| self.info_error(e))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker",
            RuntimeType::Podman => "Podman",
        };

        Ok(RuntimeMetadata {
            name: name.to_string(),
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    fn build_image(&self, options: &BuildOptions, context: Bytes) -> BuildEventStream<'_> {
        let opts = BuildImageOptions {
            dockerfile: options.dockerfile.clone(),
            t: Some(options.tag.to_string()),
            buildargs: if options.build_args.is_empty() {
                None
            } else {
                Some(options.build_args.clone())
            },
            rm: options.remove_intermediate,
            ..Default::default()
        };

        let body = Either::Left(Full::new(context));
        let stream = self.client.build_image(opts, None, Some(body));

        let events = stream.flat_map(|result| {
            let items: Vec<Result<BuildEvent, ImageError>> = match result {
                Ok(info) => map_build_info(info).into_iter().map(Ok).collect(),
                Err(e) => vec![Err(ImageError::Runtime(e.to_string()))],
            };
            futures::stream::iter(items)
        });

        Box::pin(events)
    }

    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError> {
        let image_name = reference.to_string();

        match self.client.inspect_image(&image_name).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(ImageError::Runtime(format!(
                "failed to inspect {}: {}",
                image_name, e
            ))),
        }
    }

    async fn remove_image(&self, reference: &ImageRef, force: bool) -> Result<(), ImageError> {
        let image_name = reference.to_string();

        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(&image_name, Some(opts), None)
            .await
            .map_err(|e| map_image_remove_error(e, &image_name))?;

        Ok(())
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn container_exists(&self, name: &ContainerName) -> Result<bool, ContainerError> {
        match self
            .client
            .inspect_container(name.as_str(), None::<InspectContainerOptions>)
            .await
        {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(ContainerError::Runtime(e.to_string())),
        }
    }

    async fn inspect_container(
        &self,
        name: &ContainerName,
    ) -> Result<ContainerInfo, ContainerError> {
        let details = self
            .client
            .inspect_container(name.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(map_container_not_found_error)?;

        let state = details
            .state
            .as_ref()
            .and_then(|s| s.status)
            .map(|s| match s {
                bollard::models::ContainerStateStatusEnum::CREATED => ContainerState::Created,
                bollard::models::ContainerStateStatusEnum::RUNNING => ContainerState::Running,
                bollard::models::ContainerStateStatusEnum::PAUSED => ContainerState::Paused,
                bollard::models::ContainerStateStatusEnum::RESTARTING => ContainerState::Restarting,
                bollard::models::ContainerStateStatusEnum::REMOVING => ContainerState::Removing,
                bollard::models::ContainerStateStatusEnum::EXITED => ContainerState::Exited,
                bollard::models::ContainerStateStatusEnum::DEAD => ContainerState::Dead,
                _ => ContainerState::Exited,
            })
            .unwrap_or(ContainerState::Exited);

        let id = details
            .id
            .clone()
            .ok_or_else(|| ContainerError::Runtime(format!("{} has no id", name)))?;

        Ok(ContainerInfo {
            id: ContainerId::new(id),
            name: details
                .name
                .unwrap_or_default()
                .trim_start_matches('/')
                .to_string(),
            image: details
                .config
                .as_ref()
                .and_then(|c| c.image.clone())
                .unwrap_or_default(),
            state,
            created: details.created.map(|dt| dt.to_string()).unwrap_or_default(),
            labels: details.config.and_then(|c| c.labels).unwrap_or_default(),
        })
    }

    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let mut host_config = HostConfig {
            restart_policy: Some(RestartPolicy {
                name: Some(match &config.restart_policy {
                    RestartPolicyConfig::No => RestartPolicyNameEnum::NO,
                    RestartPolicyConfig::Always => RestartPolicyNameEnum::ALWAYS,
                    RestartPolicyConfig::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
                    RestartPolicyConfig::OnFailure { .. } => RestartPolicyNameEnum::ON_FAILURE,
                }),
                maximum_retry_count: match &config.restart_policy {
                    RestartPolicyConfig::OnFailure { max_retries } => max_retries.map(|r| r as i64),
                    _ => None,
                },
            }),
            ..Default::default()
        };

        let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
        let mut exposed_ports: Vec<String> = Vec::new();
        for port in &config.ports {
            let port_key = port.port_key();
            exposed_ports.push(port_key.clone());

            if let Some(host_port) = port.host_port {
                port_bindings.insert(
                    port_key,
                    Some(vec![PortBinding {
                        host_ip: port.host_ip.clone(),
                        host_port: Some(host_port.to_string()),
                    }]),
                );
            }
        }
        if !port_bindings.is_empty() {
            host_config.port_bindings = Some(port_bindings);
        }

        let env = config.env_strings();

        let container_config = ContainerCreateBody {
            image: Some(config.image.to_string()),
            env: if env.is_empty() { None } else { Some(env) },
            labels: if config.labels.is_empty() {
                None
            } else {
                Some(config.labels.clone())
            },
            host_config: Some(host_config),
            exposed_ports: if exposed_ports.is_empty() {
                None
            } else {
                Some(exposed_ports)
            },
            stop_timeout: config.stop_timeout.map(|d| d.as_secs() as i64),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(config.name.to_string()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), container_config)
            .await
            .map_err(map_container_create_error)?;

        Ok(ContainerId::new(response.id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(
                id.as_str(),
                None::<bollard::query_parameters::StartContainerOptions>,
            )
            .await
            .map_err(map_container_start_error)
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        let opts = StopContainerOptions {
            t: Some(timeout.as_secs() as i32),
            signal: None,
        };

        self.client
            .stop_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_stop_error)
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_not_found_error)?;

        Ok(())
    }
}

impl LogOps for BollardRuntime {
    fn recent_logs(&self, id: &ContainerId, lines: u64) -> LogLineStream<'_> {
        let opts = LogsOptions {
            stdout: true,
            stderr: true,
            follow: false,
            tail: lines.to_string(),
            ..Default::default()
        };
        let missing = id.to_string();

        let stream = self.client.logs(id.as_str(), Some(opts)).map(move |result| match result {
            Ok(bollard::container::LogOutput::StdErr { message }) => {
                Ok(LogLine::stderr(String::from_utf8_lossy(&message)))
            }
            Ok(
                bollard::container::LogOutput::StdOut { message }
                | bollard::container::LogOutput::StdIn { message }
                | bollard::container::LogOutput::Console { message },
            ) => Ok(LogLine::stdout(String::from_utf8_lossy(&message))),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Err(LogError::ContainerNotFound(missing.clone())),
            Err(e) => Err(LogError::Interrupted(e.to_string())),
        });

        Box::pin(stream)
    }
}
