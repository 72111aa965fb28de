// ABOUTME: Runtime detection on the local machine.
// ABOUTME: Checks for Podman sockets first, then Docker, unless settings name one.

use super::types::{RuntimeConfig, RuntimeInfo, RuntimeType};
use std::path::Path;

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("configured socket does not exist: {0}")]
    SocketMissing(String),
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Detect the container runtime on the local system.
///
/// If `config` names a runtime, that runtime is used with the configured
/// socket or its default socket. Otherwise detection order is:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local(config: Option<&RuntimeConfig>) -> Result<RuntimeInfo, DetectionError> {
    if let Some(cfg) = config
        && let Some(runtime_type) = cfg.runtime
    {
        let socket_path = cfg
            .socket
            .clone()
            .unwrap_or_else(|| default_socket_path(runtime_type));
        if !Path::new(&socket_path).exists() {
            return Err(DetectionError::SocketMissing(socket_path));
        }
        return Ok(RuntimeInfo {
            runtime_type,
            socket_path,
        });
    }

    if let Some(socket) = config.and_then(|c| c.socket.as_deref()) {
        tracing::warn!(socket, "socket set without runtime; auto-detecting instead");
    }

    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(RuntimeInfo {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_runtime_with_missing_socket_is_an_error() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Docker),
            socket: Some("/nonexistent/buzzcraft-test.sock".to_string()),
        };

        let err = detect_local(Some(&config)).unwrap_err();
        assert!(matches!(err, DetectionError::SocketMissing(ref p) if p.contains("buzzcraft-test")));
    }

    #[test]
    fn explicit_runtime_uses_configured_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("fake.sock");
        std::fs::write(&socket, "").unwrap();

        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Podman),
            socket: Some(socket.to_string_lossy().into_owned()),
        };

        let info = detect_local(Some(&config)).unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Podman);
        assert_eq!(info.socket_path, socket.to_string_lossy());
    }
}
