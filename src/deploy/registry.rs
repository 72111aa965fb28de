// ABOUTME: In-memory registry of successful deployments, owned by one orchestrator.
// ABOUTME: Keyed by deployment id; entries live as long as the orchestrator.

use crate::types::{DeploymentId, HostPort, ImageRef, ImageId, ProjectId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::lifecycle::ContainerHandle;

/// Recorded deployments are live; failures are never recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Running,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentRecord {
    pub deployment_id: DeploymentId,
    pub project_id: ProjectId,
    pub version: String,
    pub project_path: PathBuf,
    pub image_tag: ImageRef,
    pub image_id: Option<ImageId>,
    pub container: ContainerHandle,
    pub port: HostPort,
    pub domain: String,
    pub url: String,
    pub status: DeploymentStatus,
    /// Whether the health probe saw the site serving.
    pub healthy: bool,
    pub deployed_at: DateTime<Utc>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(d: &Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn serialize_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(millis(d))
}

#[derive(Debug, Default)]
pub struct DeploymentRegistry {
    records: RwLock<HashMap<DeploymentId, DeploymentRecord>>,
}

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: DeploymentRecord) {
        self.records.write().insert(record.deployment_id, record);
    }

    pub fn get(&self, id: &DeploymentId) -> Option<DeploymentRecord> {
        self.records.read().get(id).cloned()
    }

    /// All records, oldest first.
    pub fn list(&self) -> Vec<DeploymentRecord> {
        let mut records: Vec<DeploymentRecord> = self.records.read().values().cloned().collect();
        records.sort_by_key(|r| r.deployed_at);
        records
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
