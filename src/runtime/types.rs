// ABOUTME: Which runtime is in use and where its socket lives.
// ABOUTME: Detection produces RuntimeInfo; settings may pin either part.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        })
    }
}

/// A runtime found on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub runtime_type: RuntimeType,
    pub socket_path: String,
}

/// `runtime:` and `socket:` keys of the settings file. Both unset means
/// auto-detect; `socket` alone is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub runtime: Option<RuntimeType>,
    #[serde(default)]
    pub socket: Option<String>,
}
