//! Typed abstraction over the container engine.
//!
//! Exactly the primitives the lifecycle workflows need; any engine
//! exposing these eight operations is substitutable. The production
//! implementation is [`crate::docker::DockerClient`].

use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::image::ImageSpec;

/// Live status of a node's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Running,
    Stopped,
    Created,
    /// No container exists for the node.
    Absent,
    /// The container could not be inspected.
    Unknown,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Created => "created",
            Self::Absent => "absent",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Best-effort live resource sample for a running container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub memory_bytes: u64,
    pub memory_limit_bytes: u64,
}

/// Everything needed to (re)create and start one node container.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Container name (the derived node name)
    pub name: String,
    /// Image tag to run
    pub image: String,
    /// Raw reward address, passed through as an environment variable
    pub address: String,
    /// Host data directory (bind source)
    pub data_dir: PathBuf,
    /// Host log directory (bind source)
    pub log_dir: PathBuf,
    /// Container data directory (bind target)
    pub data_path: String,
    /// Container log directory (bind target)
    pub log_path: String,
}

/// Lazily evaluated log line stream; terminates only when the caller
/// drops it or the engine closes the stream.
pub type LogStream = BoxStream<'static, Result<String>>;

/// Container engine operations consumed by the lifecycle workflows.
///
/// `stop`, `start`, and `remove` on a missing or already-transitioned
/// target degrade to a warning and succeed; `resource_usage` reports
/// `None` rather than erroring when stats cannot be sampled.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Verify the engine is reachable. Failure is fatal setup.
    async fn ping(&self) -> Result<()>;

    /// Build the shared worker image from its spec. Full rebuild, no
    /// cache reuse; build errors propagate.
    async fn build_image(&self, spec: &ImageSpec) -> Result<()>;

    /// Remove any same-named container, then create and start a detached
    /// replacement. Idempotent from the caller's perspective.
    async fn run(&self, request: &RunRequest) -> Result<()>;

    async fn stop(&self, name: &str) -> Result<()>;

    async fn start(&self, name: &str) -> Result<()>;

    /// Remove the container, stopping it first if needed.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Names of all containers (any status) matching the fleet prefix.
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    async fn status(&self, name: &str) -> Result<NodeStatus>;

    async fn resource_usage(&self, name: &str) -> Result<Option<ResourceUsage>>;

    async fn stream_logs(&self, name: &str) -> Result<LogStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(NodeStatus::Running.to_string(), "running");
        assert_eq!(NodeStatus::Stopped.to_string(), "stopped");
        assert_eq!(NodeStatus::Created.to_string(), "created");
        assert_eq!(NodeStatus::Absent.to_string(), "absent");
        assert_eq!(NodeStatus::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_status_equality() {
        assert_eq!(NodeStatus::Running, NodeStatus::Running);
        assert_ne!(NodeStatus::Running, NodeStatus::Stopped);
    }
}
