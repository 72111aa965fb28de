// ABOUTME: Derives how a deployed site is reached.
// ABOUTME: Bookkeeping only; nothing on the host network is changed.

use crate::types::HostPort;
use serde::Serialize;

use super::deployment::DeploymentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessInfo {
    pub url: String,
    pub domain: String,
    pub port: HostPort,
}

pub fn local_url(port: HostPort) -> String {
    format!("http://localhost:{}", port)
}

pub fn configure(config: &DeploymentConfig) -> AccessInfo {
    AccessInfo {
        url: local_url(config.port),
        domain: config.domain.clone(),
        port: config.port,
    }
}
