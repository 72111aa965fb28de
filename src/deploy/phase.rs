// ABOUTME: Runtime-visible deployment phases for progress reporting.
// ABOUTME: Failure results carry the phase a deployment stopped in.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentPhase {
    Validating,
    BuildingImage,
    ReplacingContainer,
    ConfiguringNetwork,
    HealthChecking,
    Recorded,
    Failed,
}

impl DeploymentPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentPhase::Recorded | DeploymentPhase::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentPhase::Validating => "validating",
            DeploymentPhase::BuildingImage => "building-image",
            DeploymentPhase::ReplacingContainer => "replacing-container",
            DeploymentPhase::ConfiguringNetwork => "configuring-network",
            DeploymentPhase::HealthChecking => "health-checking",
            DeploymentPhase::Recorded => "recorded",
            DeploymentPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for DeploymentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serialized_name() {
        for phase in [
            DeploymentPhase::Validating,
            DeploymentPhase::BuildingImage,
            DeploymentPhase::ReplacingContainer,
            DeploymentPhase::ConfiguringNetwork,
            DeploymentPhase::HealthChecking,
            DeploymentPhase::Recorded,
            DeploymentPhase::Failed,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase));
        }
    }
}
