// ABOUTME: Reachability and identity of the runtime behind the socket.
// ABOUTME: The CLI pings before a deployment so a stopped daemon fails fast.

use super::sealed::Sealed;
use async_trait::async_trait;
use std::fmt;

#[async_trait]
pub trait RuntimeInfo: Sealed + Send + Sync {
    /// Round-trip to the runtime.
    async fn ping(&self) -> Result<(), RuntimeInfoError>;

    /// Product name, server version, and platform.
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeMetadata {
    /// "Docker" or "Podman".
    pub name: String,
    pub version: String,
    /// API version the client speaks.
    pub api_version: String,
    pub os: String,
    pub arch: String,
}

impl fmt::Display for RuntimeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (API {}, {}/{})",
            self.name, self.version, self.api_version, self.os, self.arch
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    /// Nothing answered on the socket, usually because the daemon is stopped.
    #[error("runtime at {socket} is not answering: {reason}")]
    Unreachable { socket: String, reason: String },

    /// The runtime answered with an error status.
    #[error("runtime rejected the request: {0}")]
    Rejected(String),
}
