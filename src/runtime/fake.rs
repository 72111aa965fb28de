// ABOUTME: In-memory runtime used by unit tests.
// ABOUTME: Records every call and replays scripted build events, container state, and logs.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    BuildEvent, BuildEventStream, BuildOptions, ContainerConfig, ContainerError, ContainerInfo,
    ContainerOps, ContainerState, ImageError, ImageOps, LogLine, LogLineStream, LogOps,
};
use crate::types::{ContainerId, ContainerName, ImageRef};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// A runtime call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Build { tag: String },
    Exists(String),
    Inspect(String),
    Create(String),
    Start(String),
    Stop(String),
    Remove { id: String, force: bool },
    Logs { id: String, lines: u64 },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    containers: HashMap<String, (ContainerId, ContainerState)>,
    created: Vec<ContainerConfig>,
    build_events: Vec<Result<BuildEvent, String>>,
    build_contexts: Vec<Bytes>,
    create_failure: Option<String>,
    logs: Vec<String>,
    next_id: u32,
}

pub(crate) struct FakeRuntime {
    state: Mutex<State>,
}

impl FakeRuntime {
    /// A runtime whose builds succeed and which has no containers.
    pub(crate) fn new() -> Self {
        let state = State {
            build_events: vec![
                Ok(BuildEvent::Output("Step 1/14 : FROM node:18-alpine".to_string())),
                Ok(BuildEvent::Built {
                    image_id: "sha256:fake".to_string(),
                }),
            ],
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub(crate) fn with_container(self, name: &str, state: ContainerState) -> Self {
        {
            let mut s = self.state.lock();
            let id = ContainerId::new(format!("existing-{}", name));
            s.containers.insert(name.to_string(), (id, state));
        }
        self
    }

    pub(crate) fn with_build_events(self, events: Vec<Result<BuildEvent, String>>) -> Self {
        self.state.lock().build_events = events;
        self
    }

    pub(crate) fn with_create_failure(self, message: &str) -> Self {
        self.state.lock().create_failure = Some(message.to_string());
        self
    }

    pub(crate) fn with_logs(self, lines: &[&str]) -> Self {
        self.state.lock().logs = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub(crate) fn created(&self) -> Vec<ContainerConfig> {
        self.state.lock().created.clone()
    }

    pub(crate) fn build_contexts(&self) -> Vec<Bytes> {
        self.state.lock().build_contexts.clone()
    }

    pub(crate) fn container_state(&self, name: &str) -> Option<ContainerState> {
        self.state.lock().containers.get(name).map(|(_, s)| *s)
    }

    fn name_for(state: &State, id: &ContainerId) -> Option<String> {
        state
            .containers
            .iter()
            .find(|(_, (cid, _))| cid == id)
            .map(|(name, _)| name.clone())
    }
}

impl Sealed for FakeRuntime {}

#[async_trait]
impl ImageOps for FakeRuntime {
    fn build_image(&self, options: &BuildOptions, context: Bytes) -> BuildEventStream<'_> {
        let events = {
            let mut s = self.state.lock();
            s.calls.push(Call::Build {
                tag: options.tag.to_string(),
            });
            s.build_contexts.push(context);
            s.build_events.clone()
        };

        let items = events
            .into_iter()
            .map(|e| e.map_err(ImageError::Runtime));
        Box::pin(futures::stream::iter(items))
    }

    async fn image_exists(&self, _reference: &ImageRef) -> Result<bool, ImageError> {
        Ok(true)
    }

    async fn remove_image(&self, _reference: &ImageRef, _force: bool) -> Result<(), ImageError> {
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn container_exists(&self, name: &ContainerName) -> Result<bool, ContainerError> {
        let mut s = self.state.lock();
        s.calls.push(Call::Exists(name.to_string()));
        Ok(s.containers.contains_key(name.as_str()))
    }

    async fn inspect_container(
        &self,
        name: &ContainerName,
    ) -> Result<ContainerInfo, ContainerError> {
        let mut s = self.state.lock();
        s.calls.push(Call::Inspect(name.to_string()));
        let (id, state) = s
            .containers
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;

        Ok(ContainerInfo {
            id,
            name: name.to_string(),
            image: String::new(),
            state,
            created: String::new(),
            labels: HashMap::new(),
        })
    }

    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let mut s = self.state.lock();
        s.calls.push(Call::Create(config.name.to_string()));

        if let Some(message) = s.create_failure.clone() {
            return Err(ContainerError::Runtime(message));
        }
        if s.containers.contains_key(config.name.as_str()) {
            return Err(ContainerError::AlreadyExists(config.name.to_string()));
        }

        s.next_id += 1;
        let id = ContainerId::new(format!("fake{:08}", s.next_id));
        s.containers
            .insert(config.name.to_string(), (id.clone(), ContainerState::Created));
        s.created.push(config.clone());
        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut s = self.state.lock();
        s.calls.push(Call::Start(id.to_string()));
        let name = Self::name_for(&s, id).ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if let Some(entry) = s.containers.get_mut(&name) {
            entry.1 = ContainerState::Running;
        }
        Ok(())
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: Duration,
    ) -> Result<(), ContainerError> {
        let mut s = self.state.lock();
        s.calls.push(Call::Stop(id.to_string()));
        let name = Self::name_for(&s, id).ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if let Some(entry) = s.containers.get_mut(&name) {
            entry.1 = ContainerState::Exited;
        }
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let mut s = self.state.lock();
        s.calls.push(Call::Remove {
            id: id.to_string(),
            force,
        });
        let name = Self::name_for(&s, id).ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        s.containers.remove(&name);
        Ok(())
    }
}

impl LogOps for FakeRuntime {
    fn recent_logs(&self, id: &ContainerId, lines: u64) -> LogLineStream<'_> {
        let logs = {
            let mut s = self.state.lock();
            s.calls.push(Call::Logs {
                id: id.to_string(),
                lines,
            });
            s.logs.clone()
        };

        Box::pin(futures::stream::iter(logs.into_iter().map(|l| Ok(LogLine::stdout(l)))))
    }
}
