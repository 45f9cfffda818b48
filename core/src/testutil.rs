//! In-memory runtime client for workflow tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;

use crate::error::{NodeError, Result};
use crate::image::ImageSpec;
use crate::runtime::{LogStream, NodeStatus, ResourceUsage, RunRequest, RuntimeClient};

#[derive(Default)]
pub(crate) struct MockState {
    pub containers: HashMap<String, NodeStatus>,
    pub usage: HashMap<String, ResourceUsage>,
    pub builds: usize,
    pub runs: Vec<RunRequest>,
    pub log_lines: Vec<String>,
    pub engine_down: bool,
}

/// Fake container engine backed by a map of container statuses.
#[derive(Default)]
pub(crate) struct MockRuntime {
    pub state: Mutex<MockState>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_container(&self, name: &str, status: NodeStatus) {
        self.state
            .lock()
            .unwrap()
            .containers
            .insert(name.to_string(), status);
    }

    pub fn container_status(&self, name: &str) -> Option<NodeStatus> {
        self.state.lock().unwrap().containers.get(name).copied()
    }

    pub fn set_usage(&self, name: &str, usage: ResourceUsage) {
        self.state
            .lock()
            .unwrap()
            .usage
            .insert(name.to_string(), usage);
    }

    pub fn set_engine_down(&self, down: bool) {
        self.state.lock().unwrap().engine_down = down;
    }

    pub fn set_log_lines(&self, lines: &[&str]) {
        self.state.lock().unwrap().log_lines = lines.iter().map(|l| l.to_string()).collect();
    }

    pub fn builds(&self) -> usize {
        self.state.lock().unwrap().builds
    }

    pub fn runs(&self) -> Vec<RunRequest> {
        self.state.lock().unwrap().runs.clone()
    }
}

#[async_trait]
impl RuntimeClient for MockRuntime {
    async fn ping(&self) -> Result<()> {
        if self.state.lock().unwrap().engine_down {
            return Err(NodeError::EngineUnavailable("mock engine down".to_string()));
        }
        Ok(())
    }

    async fn build_image(&self, _spec: &ImageSpec) -> Result<()> {
        self.state.lock().unwrap().builds += 1;
        Ok(())
    }

    async fn run(&self, request: &RunRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.containers.remove(&request.name);
        state
            .containers
            .insert(request.name.clone(), NodeStatus::Running);
        state.runs.push(request.clone());
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<()> {
        if let Some(status) = self.state.lock().unwrap().containers.get_mut(name) {
            *status = NodeStatus::Stopped;
        }
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<()> {
        if let Some(status) = self.state.lock().unwrap().containers.get_mut(name) {
            *status = NodeStatus::Running;
        }
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.state.lock().unwrap().containers.remove(name);
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let mut names: Vec<String> = state
            .containers
            .keys()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    async fn status(&self, name: &str) -> Result<NodeStatus> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .containers
            .get(name)
            .copied()
            .unwrap_or(NodeStatus::Absent))
    }

    async fn resource_usage(&self, name: &str) -> Result<Option<ResourceUsage>> {
        Ok(self.state.lock().unwrap().usage.get(name).copied())
    }

    async fn stream_logs(&self, _name: &str) -> Result<LogStream> {
        let lines: Vec<Result<String>> = self
            .state
            .lock()
            .unwrap()
            .log_lines
            .iter()
            .map(|l| Ok(l.clone()))
            .collect();
        Ok(futures::stream::iter(lines).boxed())
    }
}
