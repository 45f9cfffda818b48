//! Docker implementation of [`RuntimeClient`] via the bollard API client.
//!
//! Structured responses only; no shelling out to the docker binary. 404
//! responses map to absence, 304 means the container is already in the
//! requested state.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, LogsOptions, RemoveContainerOptions,
    StatsOptions, StopContainerOptions,
};
use bollard::image::BuildImageOptions;
use bollard::models::{HostConfig, RestartPolicy, RestartPolicyNameEnum};
use bollard::Docker;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::{NodeError, Result};
use crate::image::ImageSpec;
use crate::runtime::{LogStream, NodeStatus, ResourceUsage, RunRequest, RuntimeClient};

/// Seconds the engine waits before killing a container on stop.
const STOP_TIMEOUT_SECS: i64 = 10;

/// Log lines replayed when a tail stream is (re)opened.
const LOG_TAIL_LINES: &str = "100";

/// Docker-backed runtime client.
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connect using the platform's default socket.
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| NodeError::EngineUnavailable(e.to_string()))?;
        Ok(Self { docker })
    }
}

fn is_not_found(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }
    )
}

fn is_not_modified(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError { status_code: 304, .. }
    )
}

/// Docker's CPU percentage formula: container delta over system delta,
/// scaled by the number of online CPUs.
fn cpu_percent(cpu_total: u64, precpu_total: u64, system: u64, presystem: u64, online_cpus: u64) -> f64 {
    let cpu_delta = cpu_total.saturating_sub(precpu_total) as f64;
    let system_delta = system.saturating_sub(presystem) as f64;
    if system_delta > 0.0 && cpu_delta >= 0.0 {
        (cpu_delta / system_delta) * online_cpus.max(1) as f64 * 100.0
    } else {
        0.0
    }
}

#[async_trait]
impl RuntimeClient for DockerClient {
    async fn ping(&self) -> Result<()> {
        self.docker
            .ping()
            .await
            .map_err(|e| NodeError::EngineUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn build_image(&self, spec: &ImageSpec) -> Result<()> {
        let context = spec.build_context()?;
        let options = BuildImageOptions::<String> {
            dockerfile: "Dockerfile".to_string(),
            t: spec.tag.clone(),
            rm: true,
            nocache: true,
            ..Default::default()
        };

        let mut stream = self.docker.build_image(options, None, Some(context.into()));
        while let Some(message) = stream.next().await {
            let info = message?;
            if let Some(error) = info.error {
                return Err(NodeError::ImageBuild(error));
            }
            if let Some(line) = info.stream {
                let line = line.trim_end();
                if !line.is_empty() {
                    debug!("build: {line}");
                }
            }
        }
        Ok(())
    }

    async fn run(&self, request: &RunRequest) -> Result<()> {
        // Replace any leftover container of the same name
        self.remove(&request.name).await?;

        let host_config = HostConfig {
            binds: Some(vec![
                format!("{}:{}", request.data_dir.display(), request.data_path),
                format!("{}:{}", request.log_dir.display(), request.log_path),
            ]),
            restart_policy: Some(RestartPolicy {
                name: Some(RestartPolicyNameEnum::UNLESS_STOPPED),
                maximum_retry_count: None,
            }),
            ..Default::default()
        };

        let config = Config {
            image: Some(request.image.clone()),
            env: Some(vec![
                format!("REWARD_ADDRESS={}", request.address),
                format!("NODE_DATA_DIR={}", request.data_path),
                format!("NODE_LOG_DIR={}", request.log_path),
            ]),
            host_config: Some(host_config),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: request.name.clone(),
            ..Default::default()
        };
        self.docker.create_container(Some(options), config).await?;
        self.docker
            .start_container::<String>(&request.name, None)
            .await?;
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<()> {
        let options = StopContainerOptions { t: STOP_TIMEOUT_SECS };
        match self.docker.stop_container(name, Some(options)).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) || is_not_modified(&e) => {
                warn!(container = name, "stop skipped: {e}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn start(&self, name: &str) -> Result<()> {
        match self.docker.start_container::<String>(name, None).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) || is_not_modified(&e) => {
                warn!(container = name, "start skipped: {e}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        match self.docker.remove_container(name, Some(options)).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => {
                warn!(container = name, "remove skipped: no such container");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![prefix.to_string()]);

        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions {
                all: true,
                filters,
                ..Default::default()
            }))
            .await?;

        let mut names = Vec::new();
        for container in containers {
            // Docker reports names with a leading slash; the name filter
            // is a substring match, so re-check the prefix
            if let Some(name) = container
                .names
                .as_ref()
                .and_then(|ns| ns.first())
                .map(|n| n.trim_start_matches('/'))
            {
                if name.starts_with(prefix) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    async fn status(&self, name: &str) -> Result<NodeStatus> {
        use bollard::models::ContainerStateStatusEnum as S;

        match self.docker.inspect_container(name, None).await {
            Ok(info) => {
                let status = info.state.and_then(|s| s.status);
                Ok(match status {
                    Some(S::RUNNING) | Some(S::RESTARTING) => NodeStatus::Running,
                    Some(S::CREATED) => NodeStatus::Created,
                    Some(S::EXITED) | Some(S::DEAD) | Some(S::PAUSED) => NodeStatus::Stopped,
                    _ => NodeStatus::Unknown,
                })
            }
            Err(e) if is_not_found(&e) => Ok(NodeStatus::Absent),
            Err(e) => {
                debug!(container = name, "inspect failed: {e}");
                Ok(NodeStatus::Unknown)
            }
        }
    }

    async fn resource_usage(&self, name: &str) -> Result<Option<ResourceUsage>> {
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };
        let mut stream = self.docker.stats(name, Some(options));
        let stats = match stream.next().await {
            Some(Ok(stats)) => stats,
            _ => return Ok(None),
        };

        let cpu = cpu_percent(
            stats.cpu_stats.cpu_usage.total_usage,
            stats.precpu_stats.cpu_usage.total_usage,
            stats.cpu_stats.system_cpu_usage.unwrap_or(0),
            stats.precpu_stats.system_cpu_usage.unwrap_or(0),
            stats.cpu_stats.online_cpus.unwrap_or(1),
        );

        Ok(Some(ResourceUsage {
            cpu_percent: cpu,
            memory_bytes: stats.memory_stats.usage.unwrap_or(0),
            memory_limit_bytes: stats.memory_stats.limit.unwrap_or(0),
        }))
    }

    async fn stream_logs(&self, name: &str) -> Result<LogStream> {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            tail: LOG_TAIL_LINES.to_string(),
            ..Default::default()
        };

        let stream = self.docker.logs(name, Some(options)).map(|item| match item {
            Ok(chunk) => Ok(String::from_utf8_lossy(&chunk.into_bytes()).into_owned()),
            Err(e) => Err(NodeError::Engine(e)),
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_percent_basic() {
        // 50% of one CPU over the sampling window
        let pct = cpu_percent(150, 100, 200, 100, 1);
        assert!((pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cpu_percent_scales_with_cpus() {
        let pct = cpu_percent(150, 100, 200, 100, 4);
        assert!((pct - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cpu_percent_zero_system_delta() {
        assert_eq!(cpu_percent(150, 100, 100, 100, 4), 0.0);
    }

    #[test]
    fn test_cpu_percent_counter_reset() {
        // precpu ahead of cpu (counter reset): clamp to zero, don't go negative
        assert_eq!(cpu_percent(50, 100, 200, 100, 1), 0.0);
    }

    #[test]
    fn test_cpu_percent_zero_online_cpus_treated_as_one() {
        let pct = cpu_percent(150, 100, 200, 100, 0);
        assert!((pct - 50.0).abs() < f64::EPSILON);
    }
}
